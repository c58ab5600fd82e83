use std::io::Cursor;

use polyxyz::{OverwritePolicy, Polynomial, PolynomialStore, StoreError};

fn parse(s: &str) -> Polynomial {
    Polynomial::parse(s).unwrap()
}

#[test]
fn round_trip() {
    let mut store = PolynomialStore::new();
    store.insert("f", parse("x^2 - 2xy + y^2")).unwrap();
    store.insert("g", parse("-1.5xy^2z^3 + 0.1")).unwrap();
    store.insert("zero", Polynomial::new()).unwrap();

    let mut export = vec![];
    store.export(&mut export).unwrap();

    let mut imported = PolynomialStore::new();
    let n = imported.import(Cursor::new(&export)).unwrap();
    assert_eq!(n, 3);

    for (name, poly) in store.iter() {
        let r = imported.get(name).unwrap();
        assert_eq!(r.terms(), poly.terms());
    }
}

#[test]
fn import_respects_policy() {
    let mut store = PolynomialStore::new();
    store.insert("f", parse("x")).unwrap();
    let mut export = vec![];
    store.export(&mut export).unwrap();

    let mut keep = PolynomialStore::with_policy(OverwritePolicy::Keep);
    keep.insert("f", parse("y")).unwrap();
    keep.import(Cursor::new(&export)).unwrap();
    assert_eq!(keep.get("f").unwrap().to_string(), "y");

    let mut replace = PolynomialStore::with_policy(OverwritePolicy::Replace);
    replace.insert("f", parse("y")).unwrap();
    replace.import(Cursor::new(&export)).unwrap();
    assert_eq!(replace.get("f").unwrap().to_string(), "x");

    let mut reject = PolynomialStore::with_policy(OverwritePolicy::Reject);
    reject.insert("f", parse("y")).unwrap();
    assert!(matches!(
        reject.import(Cursor::new(&export)),
        Err(StoreError::AlreadyExists(_))
    ));
}

#[test]
fn corrupt_input() {
    let mut store = PolynomialStore::new();
    assert!(matches!(
        store.import(Cursor::new(b"ABCD\x01")),
        Err(StoreError::Corrupt(_))
    ));
    assert!(matches!(
        store.import(Cursor::new(b"PXYZ\x07")),
        Err(StoreError::Corrupt(_))
    ));

    let mut full = PolynomialStore::new();
    full.insert("f", parse("x + 1")).unwrap();
    let mut export = vec![];
    full.export(&mut export).unwrap();
    export.truncate(export.len() - 3);
    assert!(matches!(
        store.import(Cursor::new(&export)),
        Err(StoreError::Corrupt(_))
    ));
    assert!(store.is_empty());
}
