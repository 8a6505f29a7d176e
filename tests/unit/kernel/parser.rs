use super::*;

fn var(name: &str, offset: usize) -> Expr {
    Expr::Var {
        name: name.into(),
        offset,
    }
}

fn num(v: f64) -> Expr {
    Expr::Lit(Lit::F64(v))
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let e = parse_expr("a + b*2").unwrap();
    assert_eq!(
        e,
        binary(
            BinaryOp::Add,
            var("a", 0),
            binary(BinaryOp::Mul, var("b", 4), num(2.0))
        )
    );
}

#[test]
fn ternary_is_right_associative() {
    let e = parse_expr("a ? 1 : b ? 2 : 3").unwrap();
    let Expr::Ternary { otherwise, .. } = e else {
        panic!("expected ternary");
    };
    assert!(matches!(*otherwise, Expr::Ternary { .. }));
}

#[test]
fn logical_precedence() {
    let e = parse_expr("a || b && c").unwrap();
    let Expr::Binary { op, right, .. } = e else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Or);
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::And, .. }));
}

#[test]
fn casts_and_parenthesized_expressions() {
    assert_eq!(
        parse_expr("(int)x").unwrap(),
        Expr::Cast {
            ty: ScalarType::Int,
            expr: Box::new(var("x", 5)),
        }
    );
    assert_eq!(parse_expr("(x)").unwrap(), var("x", 1));
}

#[test]
fn calls_collect_arguments() {
    let e = parse_expr("atan2f(__y, __x)").unwrap();
    let Expr::Call { func, args, offset } = e else {
        panic!("expected call");
    };
    assert_eq!(func, "atan2f");
    assert_eq!(args.len(), 2);
    assert_eq!(offset, 0);
    assert!(matches!(parse_expr("RANDFLOAT()").unwrap(), Expr::Call { args, .. } if args.is_empty()));
}

#[test]
fn unary_operators_nest() {
    assert_eq!(
        parse_expr("-!x").unwrap(),
        Expr::Unary {
            op: UnaryOp::Neg,
            expr: Box::new(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(var("x", 2)),
            }),
        }
    );
    assert_eq!(parse_expr("+x").unwrap(), var("x", 1));
}

#[test]
fn declarations_with_several_declarators() {
    let stmts = parse_fragment("float a = 1.f, b, c = a;").unwrap();
    let [Stmt::Decl { ty, vars }] = stmts.as_slice() else {
        panic!("expected one declaration");
    };
    assert_eq!(*ty, ScalarType::Float);
    let names: Vec<&str> = vars.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert!(vars[1].init.is_none());
}

#[test]
fn compound_assignments() {
    let stmts = parse_fragment("__px += 1; __py -= 2; x *= 3; x /= 4; x = 5;").unwrap();
    let ops: Vec<AssignOp> = stmts
        .iter()
        .map(|s| match s {
            Stmt::Assign { op, .. } => *op,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        ops,
        [
            AssignOp::Add,
            AssignOp::Sub,
            AssignOp::Mul,
            AssignOp::Div,
            AssignOp::Set
        ]
    );
}

#[test]
fn dangling_else_binds_to_nearest_if() {
    let stmts = parse_fragment("if (a) if (b) x = 1; else x = 2;").unwrap();
    let [Stmt::If { then, otherwise, .. }] = stmts.as_slice() else {
        panic!("expected if");
    };
    assert!(otherwise.is_none());
    assert!(matches!(**then, Stmt::If { otherwise: Some(_), .. }));
}

#[test]
fn while_blocks_and_empty_statements() {
    let stmts = parse_fragment("while (i < 3) { i += 1; } ;").unwrap();
    assert!(matches!(stmts[0], Stmt::While { .. }));
    assert_eq!(stmts[1], Stmt::Empty);
}

#[test]
fn errors_point_at_the_offending_token() {
    let err = parse_fragment("x = 1").unwrap_err();
    assert_eq!(err.offset, 5);
    let err = parse_fragment("{ x = 1;").unwrap_err();
    assert!(err.message.contains("unclosed"));
    let err = parse_expr("(1)(2)").unwrap_err();
    assert!(err.message.contains("identifier"));
}
