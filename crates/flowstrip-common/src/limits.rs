//! Centralized limits shared by the parser, transform and printer.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth the recursive-descent parser accepts.
///
/// Every nested expression, statement or type adds several frames to the
/// parser's call stack. Input nested deeper than this is rejected with a
/// parse error instead of overflowing the stack.
///
/// ```javascript
/// var x = ((((((((((((((((((((((((1))))))))))))))))))))))));
/// ```
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 1_000;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of the traversal work stack.
pub const TRAVERSAL_STACK_CAPACITY: usize = 256;

/// Source bytes per arena node, used to pre-size the node arena.
pub const SOURCE_BYTES_PER_NODE: usize = 4;
