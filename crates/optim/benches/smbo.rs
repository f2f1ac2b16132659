use criterion::{criterion_group, criterion_main, Criterion};
use env_logger::{Builder, Env};
use smbox_optim::{Dimension, SmboBuilder, Space, SurrogateKind, Value, SMBOX_LOG};

/// Branin test function: min f(x)~0.398 at x=(-pi, 12.275), (pi, 2.275), (9.42478, 2.475)
fn branin(x: &[Value]) -> anyhow::Result<f64> {
    let x: Vec<f64> = x.iter().filter_map(Value::as_f64).collect();
    let (x1, x2) = (x[0], x[1]);
    let pi = std::f64::consts::PI;
    let b = 5.1 / (4. * pi * pi);
    let c = 5. / pi;
    let t = 1. / (8. * pi);
    Ok((x2 - b * x1 * x1 + c * x1 - 6.).powi(2) + 10. * (1. - t) * x1.cos() + 10.)
}

fn criterion_smbo(c: &mut Criterion) {
    let space = Space::new(vec![
        Dimension::real(-5., 10.).unwrap(),
        Dimension::real(0., 15.).unwrap(),
    ])
    .unwrap();
    let mut group = c.benchmark_group("smbo");
    group.sample_size(10);
    for kind in [SurrogateKind::Gp, SurrogateKind::Forest, SurrogateKind::Random] {
        group.bench_function(format!("smbo branin {kind:?}"), |b| {
            let env = Env::new().filter_or(SMBOX_LOG, "error");
            let mut builder = Builder::from_env(env);
            let builder = builder.target(env_logger::Target::Stdout);
            builder.try_init().ok();

            b.iter(|| {
                std::hint::black_box(
                    SmboBuilder::optimize(branin)
                        .configure(|config| {
                            config
                                .n_calls(20)
                                .n_initial_points(5)
                                .surrogate(kind)
                                .seed(42)
                        })
                        .min_within(&space)
                        .expect("Smbo configured")
                        .run()
                        .expect("Minimization"),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_smbo);
criterion_main!(benches);
