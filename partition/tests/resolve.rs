use partition::{resolve_all, Error, PartitionMap, Resolver};

fn build(entries: &[(&str, u64, &str)]) -> PartitionMap {
    let mut map = PartitionMap::new();
    for (name, size, addr) in entries {
        map = map.with(name, *size, addr).unwrap();
    }
    map
}

fn assert_resolves(entries: &[(&str, u64, &str)], expected: &[(&str, u64)]) {
    let mut map = build(entries);
    resolve_all(&mut map).unwrap();
    for (name, addr) in expected {
        println!("{:>8}: {:X?}", name, map.address(name));
        assert_eq!(map.address(name), Some(*addr), "address of `{}`", name);
    }
}

fn assert_fails(entries: &[(&str, u64, &str)], expected: Error) {
    let mut map = build(entries);
    let err = resolve_all(&mut map).unwrap_err();
    println!("{}", err);
    assert_eq!(err, expected);
}

/// Every rotation and its reverse of the declaration order
fn orderings<'a>(entries: &[(&'a str, u64, &'a str)]) -> Vec<Vec<(&'a str, u64, &'a str)>> {
    let mut out = vec![];
    for shift in 0..entries.len() {
        let mut v = entries.to_vec();
        v.rotate_left(shift);
        out.push(v.clone());
        v.reverse();
        out.push(v);
    }
    out
}

const RELATIVE: &[(&str, u64, &str)] = &[
    ("a", 0x10, "after b"),
    ("b", 0x1000, "after c"),
    ("c", 0x1000, "0"),
    ("d", 0x1000, "before e"),
    ("e", 0x1000, "0xF000"),
];

const CONDITIONAL: &[(&str, u64, &str)] = &[
    ("a", 0x2000, "if c after b else before b"),
    ("b", 0x4000, "after c"),
    ("c", 0x4000, "if d 0x1000 else 0"),
    ("d", 0x100, "0x7000"),
];

macro_rules! case {
    ($name:ident, $entries:expr, ok: $expected:expr) => {
        #[test]
        fn $name() {
            assert_resolves($entries, $expected);
        }
    };
    ($name:ident, $entries:expr, err: $expected:expr) => {
        #[test]
        fn $name() {
            assert_fails($entries, $expected);
        }
    };
}

case!(
    relative_placement,
    RELATIVE,
    ok: &[("c", 0x0), ("b", 0x1000), ("a", 0x2000), ("e", 0xF000), ("d", 0xE000)]
);

case!(
    conditional_placement,
    CONDITIONAL,
    ok: &[("c", 0x1000), ("b", 0x5000), ("a", 0x9000), ("d", 0x7000)]
);

case!(
    conditional_else_branch,
    &[("a", 0x10, "if mcuboot after mcuboot else 0x200"), ("b", 0x10, "after a")],
    ok: &[("a", 0x200), ("b", 0x210)]
);

case!(
    conditional_unchosen_branch_may_be_unknown,
    &[("a", 0x10, "if ghost after ghost else 0x40")],
    ok: &[("a", 0x40)]
);

case!(
    conditional_chain,
    &[
        ("a", 0x10, "if b if c 0x100 else 0x200 else 0x300"),
        ("b", 0x10, "0"),
    ],
    // `if b` picks `if c 0x100`, which is not a complete expression
    err: Error::MalformedExpression {
        partition: "a".into(),
        text: "if c 0x100".into(),
    }
);

case!(
    conditional_nested_in_else,
    &[
        ("a", 0x10, "if missing 0x100 else if b after b else 0"),
        ("b", 0x10, "0x800"),
    ],
    ok: &[("a", 0x810), ("b", 0x800)]
);

case!(
    conditional_test_ignores_target_state,
    &[("a", 0x10, "if b 0x100 else 0"), ("b", 0x10, "garbage")],
    err: Error::MalformedExpression {
        partition: "b".into(),
        text: "garbage".into(),
    }
);

case!(
    before_exact_fit,
    &[("a", 0x100, "before b"), ("b", 0x10, "0x100")],
    ok: &[("a", 0x0)]
);

case!(
    unknown_partition,
    &[("x", 0x10, "before y")],
    err: Error::UnknownPartition {
        name: "y".into(),
        referrer: Some("x".into()),
    }
);

case!(
    malformed_expression,
    &[("p", 0x10, "garbage text")],
    err: Error::MalformedExpression {
        partition: "p".into(),
        text: "garbage text".into(),
    }
);

case!(
    mutual_cycle,
    &[("p", 0x10, "after q"), ("q", 0x10, "after p")],
    err: Error::Cycle {
        chain: vec!["p".into(), "q".into(), "p".into()],
        text: "after q".into(),
    }
);

case!(
    cycle_through_chosen_branch,
    &[("p", 0x10, "if q after q else 0"), ("q", 0x10, "before p")],
    err: Error::Cycle {
        chain: vec!["p".into(), "q".into(), "p".into()],
        text: "after q".into(),
    }
);

case!(
    negative_address,
    &[("a", 0x1000, "before b"), ("b", 0x10, "0x100")],
    err: Error::NegativeAddress {
        partition: "a".into(),
        text: "before b".into(),
        target: "b".into(),
        target_address: 0x100,
        size: 0x1000,
    }
);

#[test]
fn long_cycle_is_reported() {
    let names: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
    let mut map = PartitionMap::new();
    for (i, name) in names.iter().enumerate() {
        let next = &names[(i + 1) % names.len()];
        map = map.with(name, 1, &format!("after {}", next)).unwrap();
    }
    match resolve_all(&mut map) {
        Err(Error::Cycle { chain, text }) => {
            assert_eq!(chain.len(), names.len() + 1);
            assert_eq!(text, format!("after {}", names[1]));
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
}

#[test]
fn absolute_is_exact() {
    for value in [0, 1, 0x1000, 0xFFFF_FFFF, u64::MAX] {
        let text = format!("0x{:X}", value);
        let mut map = build(&[("a", 0, text.as_str())]);
        resolve_all(&mut map).unwrap();
        assert_eq!(map.address("a"), Some(value));
    }
}

#[test]
fn order_independent() {
    for fixture in [RELATIVE, CONDITIONAL] {
        let mut reference = build(fixture);
        resolve_all(&mut reference).unwrap();

        for entries in orderings(fixture) {
            let mut map = build(&entries);
            resolve_all(&mut map).unwrap();
            for (name, _, _) in fixture {
                assert_eq!(map.address(name), reference.address(name), "`{}`", name);
            }
        }
    }
}

#[test]
fn single_partition_visit_order_independent() {
    let mut all = build(CONDITIONAL);
    resolve_all(&mut all).unwrap();

    for (name, _, _) in CONDITIONAL {
        let mut map = build(CONDITIONAL);
        let mut resolver = Resolver::new(&mut map);
        let first = resolver.resolve(name).unwrap();
        resolver.resolve_all().unwrap();
        assert_eq!(Some(first), all.address(name));
        assert_eq!(map, all);
    }
}

#[test]
fn idempotent() {
    let mut map = build(RELATIVE);
    resolve_all(&mut map).unwrap();
    let once = map.clone();
    resolve_all(&mut map).unwrap();
    assert_eq!(map, once);
}

#[test]
fn after_and_before_arithmetic() {
    let mut map = build(RELATIVE);
    resolve_all(&mut map).unwrap();
    let addr = |n: &str| map.address(n).unwrap();
    let size = |n: &str| map.get(n).unwrap().size;
    assert_eq!(addr("a"), addr("b") + size("b"));
    assert_eq!(addr("b"), addr("c") + size("c"));
    assert_eq!(addr("d"), addr("e") - size("d"));
}

#[test]
fn resolved_view() {
    let mut map = build(RELATIVE);
    assert!(map.resolved().is_err());
    resolve_all(&mut map).unwrap();
    let view = map.resolved().unwrap();
    assert_eq!(view.keys().copied().collect::<Vec<_>>(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(view["d"], (0xE000, 0x1000));
}

#[test]
fn failure_messages_show_the_expression() {
    let mut map = build(&[("boot", 0x1000, "before app"), ("app", 0x10, "0x800")]);
    let msg = resolve_all(&mut map).unwrap_err().to_string();
    assert!(msg.contains("`boot` = `before app`"), "{}", msg);

    let mut map = build(&[("boot", 0x10, "if app after app else 0"), ("app", 0x10, "after boot")]);
    let msg = resolve_all(&mut map).unwrap_err().to_string();
    assert!(msg.contains("`boot` -> `app` -> `boot`"), "{}", msg);
    assert!(msg.contains("`boot` = `after app`"), "{}", msg);
}
