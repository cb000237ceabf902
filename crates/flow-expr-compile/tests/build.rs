//! Bytecode compiler behavior: end-to-end encoding, operand bounds,
//! format quirks and failure atomicity.

use flow_expr_compile::{
    build_assignable_expression, build_expression, instr, Assets, Component, DataBuffer, EnumDef,
    ExprContext, ExpressionError, ExpressionSource, Flow, Project, Value,
};
use indexmap::IndexMap;

fn project() -> Project {
    let color = EnumDef {
        members: IndexMap::from([("RED".to_string(), 0.0), ("GREEN".to_string(), 1.0)]),
    };
    Project {
        global_variables: vec!["g0", "g1", "g2", "g"]
            .into_iter()
            .map(String::from)
            .collect(),
        enums: IndexMap::from([("Color".to_string(), color)]),
    }
}

fn component() -> Component {
    Component {
        inputs: vec!["a".to_string()],
    }
}

fn flow() -> Flow {
    Flow {
        local_variables: vec!["loc".to_string()],
    }
}

/// Compile `source` against the standard fixture, returning the words
/// and the finished constant pool.
fn build(source: ExpressionSource) -> Result<(Vec<u16>, Vec<Value>), ExpressionError> {
    let component = component();
    let flow = flow();
    let project = project();
    let ctx = ExprContext {
        component: &component,
        flow: &flow,
        project: &project,
    };
    let mut assets = Assets::new(&project);
    let mut buffer = DataBuffer::new();
    build_expression(&mut assets, &mut buffer, &ctx, source)?;
    Ok((buffer.words(), assets.constants().to_vec()))
}

#[test]
fn end_to_end_encoding() {
    // a is input 0, g is global 3, Color.GREEN interns 1.0 at slot 0.
    // Precedence gives a + ((Color.GREEN) * g).
    let (words, constants) = build(ExpressionSource::Text("a + Color.GREEN * g")).unwrap();
    assert_eq!(
        words,
        vec![
            8192,  // PUSH_INPUT(0)
            0,     // PUSH_CONSTANT(0)
            24579, // PUSH_GLOBAL_VAR(3)
            32770, // OPERATION(mul = 2)
            32768, // OPERATION(add = 0)
            40960, // END
        ]
    );
    assert_eq!(constants, vec![Value::Number(1.0)]);
}

#[test]
fn compilation_is_deterministic() {
    let source = ExpressionSource::Text("Math.max(a, loc) > g ? a : Color.RED");
    let first = build(source).unwrap();
    let second = build(source).unwrap();
    assert_eq!(first, second);
}

#[test]
fn identifier_precedence_prefers_inputs() {
    let component = Component {
        inputs: vec!["x".to_string()],
    };
    let flow = Flow {
        local_variables: vec!["x".to_string()],
    };
    let project = Project {
        global_variables: vec!["x".to_string()],
        enums: IndexMap::new(),
    };
    let ctx = ExprContext {
        component: &component,
        flow: &flow,
        project: &project,
    };
    let mut assets = Assets::new(&project);
    let mut buffer = DataBuffer::new();
    build_expression(&mut assets, &mut buffer, &ctx, ExpressionSource::Text("x")).unwrap();
    assert_eq!(
        buffer.words(),
        vec![instr::push_input(0).unwrap(), instr::end()]
    );
}

#[test]
fn call_emits_raw_function_index() {
    // Format quirk: the call word is the bare operation index with no
    // OPERATION tag. Math.sin is index 23.
    let (words, _) = build(ExpressionSource::Text("Math.sin(a)")).unwrap();
    assert_eq!(words, vec![8192, 23, 40960]);
}

#[test]
fn conditional_emits_all_three_branches() {
    let (words, constants) = build(ExpressionSource::Text("a ? 1 : 2")).unwrap();
    assert_eq!(
        words,
        vec![
            8192,          // PUSH_INPUT(0)
            0,             // PUSH_CONSTANT(0) -- consequent
            1,             // PUSH_CONSTANT(1) -- alternate
            32768 + 22,    // OPERATION(conditional)
            40960,         // END
        ]
    );
    assert_eq!(constants, vec![Value::Number(1.0), Value::Number(2.0)]);
}

#[test]
fn degenerate_sources() {
    let (words, constants) = build(ExpressionSource::Empty).unwrap();
    assert_eq!(words, vec![0, 40960]);
    assert_eq!(constants, vec![Value::Undefined]);

    let (words, constants) = build(ExpressionSource::Number(4.5)).unwrap();
    assert_eq!(words, vec![0, 40960]);
    assert_eq!(constants, vec![Value::Number(4.5)]);

    // Blank text compiles like an absent source
    let (words, constants) = build(ExpressionSource::Text("   ")).unwrap();
    assert_eq!(words, vec![0, 40960]);
    assert_eq!(constants, vec![Value::Undefined]);
}

#[test]
fn constant_pool_interns_structurally() {
    let (words, constants) = build(ExpressionSource::Text("1 + 1 + 'x'")).unwrap();
    // Both literal 1s share slot 0
    assert_eq!(words[0], words[1]);
    assert_eq!(constants, vec![Value::Number(1.0), Value::from("x")]);
}

#[test]
fn failed_build_leaves_buffer_untouched() {
    let component = component();
    let flow = flow();
    let project = project();
    let ctx = ExprContext {
        component: &component,
        flow: &flow,
        project: &project,
    };
    let mut assets = Assets::new(&project);
    let mut buffer = DataBuffer::new();

    let result = build_expression(
        &mut assets,
        &mut buffer,
        &ctx,
        ExpressionSource::Text("a + missing"),
    );
    assert_eq!(
        result,
        Err(ExpressionError::UnresolvedIdentifier {
            name: "missing".to_string()
        })
    );
    assert!(buffer.bytes().is_empty());
}

#[test]
fn input_ordinal_beyond_operand_width_is_an_error() {
    let component = Component {
        inputs: (0..8193).map(|i| format!("in{}", i)).collect(),
    };
    let flow = Flow::default();
    let project = Project::default();
    let ctx = ExprContext {
        component: &component,
        flow: &flow,
        project: &project,
    };
    let mut assets = Assets::new(&project);
    let mut buffer = DataBuffer::new();

    // in8191 is the last encodable ordinal
    assert!(build_expression(
        &mut assets,
        &mut buffer,
        &ctx,
        ExpressionSource::Text("in8191")
    )
    .is_ok());

    let result = build_expression(
        &mut assets,
        &mut buffer,
        &ctx,
        ExpressionSource::Text("in8192"),
    );
    assert_eq!(
        result,
        Err(ExpressionError::IndexOutOfRange {
            what: "component input",
            index: 8192
        })
    );
}

#[test]
fn enum_members_and_constants_compile_to_pushes() {
    let (words, constants) = build(ExpressionSource::Text("Color.RED")).unwrap();
    assert_eq!(words, vec![0, 40960]);
    assert_eq!(constants, vec![Value::Number(0.0)]);

    let (_, constants) = build(ExpressionSource::Text("Math.PI")).unwrap();
    assert_eq!(constants, vec![Value::Number(std::f64::consts::PI)]);
}

#[test]
fn member_lookups_use_the_allocator_root_project() {
    // The allocator's root project can be a richer view than the check
    // context (e.g. imported enums merged in at build time); the
    // compiler must resolve members against the allocator's view.
    let component = component();
    let flow = flow();
    let bare = Project::default();
    let ctx = ExprContext {
        component: &component,
        flow: &flow,
        project: &bare,
    };
    let root = project();
    let mut assets = Assets::new(&root);
    let mut buffer = DataBuffer::new();

    build_expression(
        &mut assets,
        &mut buffer,
        &ctx,
        ExpressionSource::Text("Color.GREEN"),
    )
    .unwrap();
    assert_eq!(buffer.words(), vec![0, 40960]);
    assert_eq!(assets.constants(), &[Value::Number(1.0)]);
}

#[test]
fn assignable_build_accepts_and_rejects_like_the_checker() {
    let component = component();
    let flow = flow();
    let project = project();
    let ctx = ExprContext {
        component: &component,
        flow: &flow,
        project: &project,
    };

    let mut assets = Assets::new(&project);
    let mut buffer = DataBuffer::new();
    build_assignable_expression(&mut assets, &mut buffer, &ctx, ExpressionSource::Text("a"))
        .unwrap();
    assert_eq!(buffer.words(), vec![8192, 40960]);

    let mut buffer = DataBuffer::new();
    build_assignable_expression(
        &mut assets,
        &mut buffer,
        &ctx,
        ExpressionSource::Text("g ? a : loc"),
    )
    .unwrap();
    assert_eq!(
        buffer.words(),
        vec![24579, 8192, 16384, 32768 + 22, 40960]
    );

    let mut buffer = DataBuffer::new();
    let result = build_assignable_expression(
        &mut assets,
        &mut buffer,
        &ctx,
        ExpressionSource::Text("a + 1"),
    );
    assert_eq!(result, Err(ExpressionError::NotAssignable));
    assert!(buffer.bytes().is_empty());
}
