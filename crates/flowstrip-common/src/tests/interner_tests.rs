use super::*;

#[test]
fn test_intern_deduplicates() {
    let mut interner = Interner::new();
    let a = interner.intern("param1");
    let b = interner.intern("param1");
    let c = interner.intern("param2");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.resolve(a), "param1");
    assert_eq!(interner.resolve(c), "param2");
}

#[test]
fn test_empty_string_is_none_atom() {
    let mut interner = Interner::new();
    assert!(interner.is_empty());
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(interner.resolve(Atom::NONE), "");
}

#[test]
fn test_resolve_out_of_bounds_is_empty() {
    let interner = Interner::new();
    assert_eq!(interner.resolve(Atom(999)), "");
}

#[test]
fn test_intern_common_and_lookup() {
    let mut interner = Interner::new();
    interner.intern_common();
    assert!(interner.lookup("interface").is_some());
    assert!(interner.lookup("declare").is_some());
    assert!(interner.lookup("not-interned").is_none());
    assert!(!interner.is_empty());
}
