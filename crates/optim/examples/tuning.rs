use smbox_optim::{AcqFunc, Dimension, SmboBuilder, Space, SurrogateKind, Value};

/// Validation loss of an imaginary model given its hyperparameters
/// (learning rate, depth, activation). Deep models with a large learning
/// rate diverge and the evaluation fails.
fn validation_loss(x: &[Value]) -> anyhow::Result<f64> {
    let lr = x[0].as_f64().ok_or_else(|| anyhow::anyhow!("bad learning rate"))?;
    let depth = x[1].as_i64().ok_or_else(|| anyhow::anyhow!("bad depth"))?;
    let activation = x[2].as_str().ok_or_else(|| anyhow::anyhow!("bad activation"))?;
    if depth > 8 && lr > 0.05 {
        anyhow::bail!("training diverged");
    }
    let bonus = match activation {
        "relu" => 0.,
        "tanh" => 0.05,
        _ => 0.2,
    };
    Ok((lr.log10() + 2.5).powi(2) + 0.02 * (depth as f64 - 6.).powi(2) + bonus)
}

fn main() -> anyhow::Result<()> {
    let space = Space::new(vec![
        Dimension::log_real(1e-5, 1e-1)?,
        Dimension::integer(1, 12)?,
        Dimension::categorical(["relu", "tanh", "sigmoid"])?,
    ])?;

    for surrogate in [SurrogateKind::Gp, SurrogateKind::Forest, SurrogateKind::Random] {
        let res = SmboBuilder::optimize(validation_loss)
            .configure(|config| {
                config
                    .n_calls(40)
                    .n_initial_points(10)
                    .surrogate(surrogate)
                    .acq_func(AcqFunc::Ei)
                    .n_jobs(-1)
                    .seed(42)
            })
            .min_within(&space)?
            .run()?;
        println!("{surrogate:?}: {res} ({} fallbacks)", res.n_fallbacks);
    }
    Ok(())
}
