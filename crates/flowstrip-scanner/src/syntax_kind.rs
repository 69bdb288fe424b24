//! Token kinds produced by the scanner.
//!
//! Reserved words always scan as their keyword kind. Contextual keywords
//! (`type`, `interface`, `declare`, `of`, ...) also scan as keyword kinds; the
//! parser decides from context whether to treat them as identifiers.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::Serialize;

macro_rules! syntax_kinds {
    (
        plain { $($plain:ident,)* }
        punctuation { $($punct:ident = $ptext:literal,)* }
        reserved { $($reserved:ident = $rtext:literal,)* }
        contextual { $($contextual:ident = $ctext:literal,)* }
    ) => {
        /// Token kind.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($plain,)*
            $($punct,)*
            $($reserved,)*
            $($contextual,)*
        }

        impl SyntaxKind {
            /// Source text of a punctuation or keyword token.
            pub fn text(self) -> Option<&'static str> {
                match self {
                    $(SyntaxKind::$punct => Some($ptext),)*
                    $(SyntaxKind::$reserved => Some($rtext),)*
                    $(SyntaxKind::$contextual => Some($ctext),)*
                    _ => None,
                }
            }

            /// Reserved words can never be used as identifiers.
            pub fn is_reserved_word(self) -> bool {
                matches!(self, $(SyntaxKind::$reserved)|*)
            }

            /// Contextual keywords are identifiers outside their special position.
            pub fn is_contextual_keyword(self) -> bool {
                matches!(self, $(SyntaxKind::$contextual)|*)
            }
        }

        static KEYWORDS: Lazy<FxHashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
            let mut map = FxHashMap::default();
            $(map.insert($rtext, SyntaxKind::$reserved);)*
            $(map.insert($ctext, SyntaxKind::$contextual);)*
            map
        });
    };
}

syntax_kinds! {
    plain {
        Unknown,
        EndOfFileToken,
        NumericLiteral,
        StringLiteral,
        RegularExpressionLiteral,
        NoSubstitutionTemplateLiteral,
        TemplateHead,
        TemplateMiddle,
        TemplateTail,
        Identifier,
    }
    punctuation {
        OpenBraceToken = "{",
        CloseBraceToken = "}",
        OpenParenToken = "(",
        CloseParenToken = ")",
        OpenBracketToken = "[",
        CloseBracketToken = "]",
        DotToken = ".",
        DotDotDotToken = "...",
        SemicolonToken = ";",
        CommaToken = ",",
        LessThanToken = "<",
        GreaterThanToken = ">",
        LessThanEqualsToken = "<=",
        GreaterThanEqualsToken = ">=",
        EqualsEqualsToken = "==",
        ExclamationEqualsToken = "!=",
        EqualsEqualsEqualsToken = "===",
        ExclamationEqualsEqualsToken = "!==",
        EqualsGreaterThanToken = "=>",
        PlusToken = "+",
        MinusToken = "-",
        AsteriskToken = "*",
        AsteriskAsteriskToken = "**",
        SlashToken = "/",
        PercentToken = "%",
        PlusPlusToken = "++",
        MinusMinusToken = "--",
        LessThanLessThanToken = "<<",
        GreaterThanGreaterThanToken = ">>",
        GreaterThanGreaterThanGreaterThanToken = ">>>",
        AmpersandToken = "&",
        BarToken = "|",
        CaretToken = "^",
        ExclamationToken = "!",
        TildeToken = "~",
        AmpersandAmpersandToken = "&&",
        BarBarToken = "||",
        QuestionToken = "?",
        ColonToken = ":",
        EqualsToken = "=",
        PlusEqualsToken = "+=",
        MinusEqualsToken = "-=",
        AsteriskEqualsToken = "*=",
        AsteriskAsteriskEqualsToken = "**=",
        SlashEqualsToken = "/=",
        PercentEqualsToken = "%=",
        LessThanLessThanEqualsToken = "<<=",
        GreaterThanGreaterThanEqualsToken = ">>=",
        GreaterThanGreaterThanGreaterThanEqualsToken = ">>>=",
        AmpersandEqualsToken = "&=",
        BarEqualsToken = "|=",
        CaretEqualsToken = "^=",
    }
    reserved {
        BreakKeyword = "break",
        CaseKeyword = "case",
        CatchKeyword = "catch",
        ClassKeyword = "class",
        ConstKeyword = "const",
        ContinueKeyword = "continue",
        DebuggerKeyword = "debugger",
        DefaultKeyword = "default",
        DeleteKeyword = "delete",
        DoKeyword = "do",
        ElseKeyword = "else",
        EnumKeyword = "enum",
        ExportKeyword = "export",
        ExtendsKeyword = "extends",
        FalseKeyword = "false",
        FinallyKeyword = "finally",
        ForKeyword = "for",
        FunctionKeyword = "function",
        IfKeyword = "if",
        ImportKeyword = "import",
        InKeyword = "in",
        InstanceOfKeyword = "instanceof",
        NewKeyword = "new",
        NullKeyword = "null",
        ReturnKeyword = "return",
        SuperKeyword = "super",
        SwitchKeyword = "switch",
        ThisKeyword = "this",
        ThrowKeyword = "throw",
        TrueKeyword = "true",
        TryKeyword = "try",
        TypeOfKeyword = "typeof",
        VarKeyword = "var",
        VoidKeyword = "void",
        WhileKeyword = "while",
        WithKeyword = "with",
    }
    contextual {
        AsKeyword = "as",
        AsyncKeyword = "async",
        AwaitKeyword = "await",
        DeclareKeyword = "declare",
        FromKeyword = "from",
        GetKeyword = "get",
        ImplementsKeyword = "implements",
        InterfaceKeyword = "interface",
        LetKeyword = "let",
        ModuleKeyword = "module",
        OfKeyword = "of",
        SetKeyword = "set",
        StaticKeyword = "static",
        TypeKeyword = "type",
        YieldKeyword = "yield",
    }
}

/// Look up the keyword kind for an identifier's text.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    KEYWORDS.get(text).copied()
}

impl SyntaxKind {
    /// Identifier or a contextual keyword (which can always serve as a binding
    /// name in sloppy-mode scripts).
    pub fn is_identifier_like(self) -> bool {
        self == SyntaxKind::Identifier || self.is_contextual_keyword()
    }

    /// Any token whose text can serve as a property name after `.` or in an
    /// object literal key.
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_reserved_word() || self.is_contextual_keyword()
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::EqualsToken
                | SyntaxKind::PlusEqualsToken
                | SyntaxKind::MinusEqualsToken
                | SyntaxKind::AsteriskEqualsToken
                | SyntaxKind::AsteriskAsteriskEqualsToken
                | SyntaxKind::SlashEqualsToken
                | SyntaxKind::PercentEqualsToken
                | SyntaxKind::LessThanLessThanEqualsToken
                | SyntaxKind::GreaterThanGreaterThanEqualsToken
                | SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
                | SyntaxKind::AmpersandEqualsToken
                | SyntaxKind::BarEqualsToken
                | SyntaxKind::CaretEqualsToken
        )
    }

    /// Binding power of a binary operator, or 0 if the token is not one.
    ///
    /// `in` is included; the parser masks it out inside `for (... in ...)`
    /// heads.
    pub fn binary_precedence(self) -> u8 {
        match self {
            SyntaxKind::BarBarToken => 1,
            SyntaxKind::AmpersandAmpersandToken => 2,
            SyntaxKind::BarToken => 3,
            SyntaxKind::CaretToken => 4,
            SyntaxKind::AmpersandToken => 5,
            SyntaxKind::EqualsEqualsToken
            | SyntaxKind::ExclamationEqualsToken
            | SyntaxKind::EqualsEqualsEqualsToken
            | SyntaxKind::ExclamationEqualsEqualsToken => 6,
            SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::LessThanEqualsToken
            | SyntaxKind::GreaterThanEqualsToken
            | SyntaxKind::InstanceOfKeyword
            | SyntaxKind::InKeyword => 7,
            SyntaxKind::LessThanLessThanToken
            | SyntaxKind::GreaterThanGreaterThanToken
            | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 8,
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => 9,
            SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 10,
            SyntaxKind::AsteriskAsteriskToken => 11,
            _ => 0,
        }
    }

    pub fn is_logical_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::BarBarToken | SyntaxKind::AmpersandAmpersandToken
        )
    }

    /// Tokens that end a template: the scanner produces these from
    /// `re_scan_template_token`.
    pub fn is_template_continuation(self) -> bool {
        matches!(self, SyntaxKind::TemplateMiddle | SyntaxKind::TemplateTail)
    }

    /// Human readable description used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self.text() {
            Some(text) => text,
            None => match self {
                SyntaxKind::EndOfFileToken => "end of file",
                SyntaxKind::Identifier => "identifier",
                SyntaxKind::NumericLiteral => "number",
                SyntaxKind::StringLiteral => "string",
                SyntaxKind::RegularExpressionLiteral => "regular expression",
                SyntaxKind::NoSubstitutionTemplateLiteral
                | SyntaxKind::TemplateHead
                | SyntaxKind::TemplateMiddle
                | SyntaxKind::TemplateTail => "template",
                _ => "token",
            },
        }
    }
}
