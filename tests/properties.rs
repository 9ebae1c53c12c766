use dice_compile::common::{NonZeroUInt, UInt};
use dice_compile::parse::{ast::Node, ParseErrorKind};
use dice_compile::roll::{DiceTrace, DieRoll};
use dice_compile::{
    compile_traced, compile_value, optimize, parse, CompileError, Roller, TraceNode, Traced,
};
use rand::{rngs::StdRng, SeedableRng};

/// Replays `faces` in order, then repeats the last one.
struct Faces {
    faces: Vec<UInt>,
    next: usize,
}

impl Faces {
    fn new(faces: &[UInt]) -> Self {
        Self {
            faces: faces.to_vec(),
            next: 0,
        }
    }
}

impl Roller for Faces {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        let face = self
            .faces
            .get(self.next)
            .or_else(|| self.faces.last())
            .copied()
            .unwrap_or(1);
        self.next += 1;
        face.min(sides.get())
    }
}

/// Always rolls the highest face.
struct Max;

impl Roller for Max {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        sides.get()
    }
}

fn value(s: &str, faces: &[UInt]) -> i64 {
    compile_value(s).unwrap().invoke(&mut Faces::new(faces))
}

#[test]
fn constant_ignores_draws() {
    assert_eq!(value("4", &[]), 4);
    assert_eq!(value("4", &[1, 2, 3]), 4);
    assert_eq!(compile_value("4").unwrap().invoke(&mut Max), 4);
}

#[test]
fn precedence() {
    assert_eq!(value("4 + 3 * 2", &[]), 10);
    assert_eq!(value("(4 + 3) * 2", &[]), 14);
    assert_eq!(value("20 - 6 / 2 - 1", &[]), 16);
}

#[test]
fn grouped_dice() {
    assert_eq!(value("(1d4 + 1) * 2", &[3]), 8);
}

#[test]
fn keep_highest() {
    assert_eq!(value("2d20kh1", &[15, 3]), 15);

    let (total, tree) = compile_traced("2d20kh1")
        .unwrap()
        .invoke(&mut Faces::new(&[15, 3]));
    assert_eq!(total, 15);
    match tree {
        TraceNode::Dice(DiceTrace { rolls, total, .. }) => {
            assert_eq!(total, 15);
            assert_eq!(
                rolls,
                vec![
                    DieRoll {
                        face: 15,
                        exploded: false,
                        kept: true
                    },
                    DieRoll {
                        face: 3,
                        exploded: false,
                        kept: false
                    },
                ]
            );
        }
        other => panic!("expected a dice trace, found {:?}", other),
    }
}

#[test]
fn explosion_terminates() {
    assert_eq!(compile_value("1d1!").unwrap().invoke(&mut Max), 101);
    assert_eq!(compile_value("1d6!").unwrap().invoke(&mut Max), 6 * 101);

    let (total, _) = compile_traced("1d1!").unwrap().invoke(&mut Max);
    assert_eq!(total, 101);
}

#[test]
fn large_terms_are_unbounded_by_default() {
    assert_eq!(value("300d6", &[1]), 300);

    let (total, tree) = compile_traced("1000d6kh10")
        .unwrap()
        .invoke(&mut Faces::new(&[1]));
    assert_eq!(total, 10);
    match tree {
        TraceNode::Dice(dice) => {
            assert_eq!(dice.rolls.len(), 1000);
            assert_eq!(dice.kept().count(), 10);
        }
        other => panic!("expected a dice trace, found {:?}", other),
    }
}

#[test]
fn boxed_roller() {
    let mut roller: Box<dyn Roller> = Box::new(Faces::new(&[4, 2]));
    assert_eq!(compile_value("2d6").unwrap().invoke(&mut *roller), 6);

    let mut roller: Box<dyn Roller> = Box::new(StdRng::seed_from_u64(3));
    let expected = compile_value("4d6kh3").unwrap().invoke(&mut StdRng::seed_from_u64(3));
    let (total, _) = compile_traced("4d6kh3").unwrap().invoke(roller.as_mut());
    assert_eq!(total, expected);
}

#[test]
fn keep_exceeds_count() {
    match compile_value("2d6kh3") {
        Err(CompileError::ParseError(err)) => {
            assert_eq!(err.kind, ParseErrorKind::KeepExceedsCount { keep: 3, count: 2 });
        }
        other => panic!("expected a parse error, found {:?}", other),
    }
}

#[test]
fn constant_expressions_fold_completely() {
    for s in ["4 + 3 * 2", "(1 + 2) * (3 - 4) / 2", "-8 / 3", "2 * 2 * 2 - 1 - 1"] {
        let parsed = parse(s).unwrap();
        assert!(!parsed.contains_dice());
        let optimized = optimize(parsed).unwrap();
        let expected = compile_value(s).unwrap().invoke(&mut Max);
        assert_eq!(optimized, Node::Constant(expected), "folding {:?}", s);
    }
}

#[test]
fn evaluators_agree() {
    let expressions = [
        "2d20kh1 + 5",
        "4d6kl3 * 2 - 1d4",
        "1d6! + 1d6! + 1d6!",
        "(2d8 - 1d4) / 1d3",
        "8d10kh3 - 8d10kl3",
    ];
    for s in expressions {
        let value = compile_value(s).unwrap();
        let traced = compile_traced(s).unwrap();
        for seed in 0..500 {
            let expected = value.invoke(&mut StdRng::seed_from_u64(seed));
            let (actual, tree) = traced.invoke(&mut StdRng::seed_from_u64(seed));
            assert_eq!(expected, actual, "{:?} with seed {}", s, seed);
            assert_eq!(tree.value(), actual);
        }
    }
}

#[test]
fn reuse_keeps_no_state() {
    let eval = compile_value("3d6kh2 + 1d4!").unwrap();
    let first = eval.invoke(&mut StdRng::seed_from_u64(7));
    for _ in 0..10_000 {
        eval.invoke(&mut rand::thread_rng());
    }
    assert_eq!(eval.invoke(&mut StdRng::seed_from_u64(7)), first);
}

#[test]
fn concurrent_invocation() {
    let eval = compile_value("4d6kh3 + 2").unwrap();
    let expected: Vec<_> = (0..8)
        .map(|seed| eval.invoke(&mut StdRng::seed_from_u64(seed)))
        .collect();

    let actual: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|seed| {
                let eval = &eval;
                scope.spawn(move || eval.invoke(&mut StdRng::seed_from_u64(seed)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(actual, expected);
}
