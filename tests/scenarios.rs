use polyxyz::{PolyError, Polynomial, Term, Variable};

fn parse(s: &str) -> Polynomial {
    Polynomial::parse(s).unwrap()
}

fn has_term(p: &Polynomial, rendered: &str) -> bool {
    p.terms().iter().any(|t| t.to_string() == rendered)
}

#[test]
fn term_from_string() {
    let t = Term::parse("3x^2y").unwrap();
    assert_eq!(t.coefficient(), 3.0);
    assert_eq!((t.power_x(), t.power_y(), t.power_z()), (2, 1, 0));

    let t = Term::parse("-1.5xy^2z^3").unwrap();
    assert_eq!(t.coefficient(), -1.5);
    assert_eq!((t.power_x(), t.power_y(), t.power_z()), (1, 2, 3));
}

#[test]
fn term_arithmetic() {
    let a = Term::parse("2x^2y").unwrap();
    let b = Term::parse("3x^2y").unwrap();
    assert_eq!(a.try_add(&b).unwrap(), Term::new(5.0, 2, 1, 0));

    let c = Term::parse("3xy^2").unwrap();
    assert!(matches!(
        a.try_add(&c),
        Err(PolyError::IncompatibleTerms { .. })
    ));

    let d = Term::parse("3xy^3").unwrap();
    assert_eq!(a.try_mul(&d).unwrap(), Term::new(6.0, 3, 4, 0));
    assert_eq!(a.mul_coeff(3.0), Term::new(6.0, 2, 1, 0));
}

#[test]
fn creation_and_parsing() {
    let p = parse("2x^2 + 3y - z");
    let s = p.to_string();
    assert!(s.contains("2x^2"));
    assert!(s.contains("3y"));
    assert!(s.contains("-z"));
}

#[test]
fn addition() {
    let r = &parse("x + y") + &parse("2x - y");
    assert_eq!(r.to_string(), "3x");
    assert_eq!(r.nterms(), 1);
}

#[test]
fn multiplication() {
    let r = parse("x + y").try_mul(&parse("x - y")).unwrap();
    assert!(has_term(&r, "x^2"));
    assert!(has_term(&r, "-y^2"));
}

#[test]
fn division_by_scalar() {
    let r = parse("4x + 6y").div_coeff(2.0).unwrap();
    assert!(has_term(&r, "2x"));
    assert!(has_term(&r, "3y"));
}

#[test]
fn ordering() {
    let p = parse("x + x^3 + x^2");
    let powers: Vec<_> = p.terms().iter().map(|t| t.power(Variable::X)).collect();
    assert_eq!(powers, [3, 2, 1]);
}

#[test]
fn division_by_zero() {
    assert_eq!(parse("x").div_coeff(0.0), Err(PolyError::DivisionByZero));
    assert_eq!(
        Term::new(1.0, 1, 0, 0).div_coeff(0.0),
        Err(PolyError::DivisionByZero)
    );
}

#[test]
fn degree_overflow() {
    let r = parse("x^9 + 1").try_mul(&parse("y + x"));
    assert!(matches!(r, Err(PolyError::DegreeOverflow { .. })));
}

#[test]
fn subtract_self() {
    let p = parse("3x^2y - 0.5z + 7");
    assert_eq!((&p - &p).to_string(), "0");
}

#[test]
fn round_trip() {
    let p = parse("-x^3y + 0.125xz^2 - y + 3");
    let text = p.to_string();
    assert_eq!(text, "-x^3y+0.125xz^2-y+3");
    assert_eq!(parse(&text), p);
}
