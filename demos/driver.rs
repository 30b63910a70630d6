use isolate::{
    equate,
    ops::{self, Bindings},
    solve_for, Arena,
};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("isolate=info")),
        )
        .init();

    let mut arena = Arena::new();

    // 1 + 2
    let one = arena.number(1.0);
    let two = arena.number(2.0);
    let sum = arena.add(one, two);
    println!(
        "{} => {:.6}",
        arena.display(sum),
        ops::evaluate(&arena, sum, &Bindings::new())
    );

    // x + 2, where x = 1
    let x = arena.variable("x");
    let two = arena.number(2.0);
    let sum = arena.add(x, two);
    let bindings = Bindings::new().with("x", 1.0);
    println!(
        "{} => {:.6}",
        arena.display(sum),
        ops::evaluate(&arena, sum, &bindings)
    );

    // solve x + 2 = 3
    let x = arena.variable("x");
    let two = arena.number(2.0);
    let left = arena.add(x, two);
    let right = arena.number(3.0);
    solve(&mut arena, equate(left, right), "x")?;

    // solve 2 = 3 - x
    let left = arena.number(2.0);
    let three = arena.number(3.0);
    let x = arena.variable("x");
    let right = arena.sub(three, x);
    solve(&mut arena, equate(left, right), "x")?;

    Ok(())
}

fn solve(
    arena: &mut Arena,
    mut equation: isolate::Equation,
    unknown: &str,
) -> Result<(), isolate::SolveError> {
    let original = arena.stringize(equation);
    let solution = solve_for(arena, &mut equation, unknown)?;
    let value = ops::evaluate(arena, solution, &Bindings::new());

    println!(
        "solve {} [{}] => {} => {:.6}",
        unknown,
        original,
        arena.display(solution),
        value
    );

    Ok(())
}
