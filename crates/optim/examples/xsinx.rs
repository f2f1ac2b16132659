use smbox_optim::{Dimension, SmboBuilder, Space, Value};

fn xsinx(x: &[Value]) -> anyhow::Result<f64> {
    let x = x[0]
        .as_f64()
        .ok_or_else(|| anyhow::anyhow!("real value expected"))?;
    Ok((x - 3.5) * ((x - 3.5) / std::f64::consts::PI).sin())
}

fn main() {
    let space = Space::new(vec![Dimension::real(0., 25.).expect("valid bounds")])
        .expect("valid space");
    let res = SmboBuilder::optimize(xsinx)
        .configure(|config| config.n_calls(25))
        .min_within(&space)
        .expect("Smbo configured")
        .run()
        .expect("Minimization of xsinx");
    println!("Minimum xsinx(x) = {} at x = {:?}", res.y_opt, res.x_opt);
}
