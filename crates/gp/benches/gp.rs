use criterion::{criterion_group, criterion_main, Criterion};
use linfa::prelude::{Dataset, Fit};
use ndarray::{array, Array1, Zip};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use smbox_doe::{Lhs, SamplingMethod};
use smbox_gp::correlation_models::{Matern52Corr, SquaredExponentialCorr};
use smbox_gp::mean_models::ConstantMean;
use smbox_gp::GaussianProcess;

fn griewank(x: &Array1<f64>) -> f64 {
    let dim = x.len();
    let d = Array1::linspace(1., dim as f64, dim).mapv(|v| v.sqrt());
    x.mapv(|v| v * v).sum() / 4000. - (x / &d).mapv(|v| v.cos()).fold(1., |acc, x| acc * x) + 1.0
}

fn criterion_gp(c: &mut Criterion) {
    let dims = [2, 5];
    let nts = [20, 50];

    let mut group = c.benchmark_group("gp");
    group.sample_size(20);
    for (&dim, &nt) in dims.iter().zip(nts.iter()) {
        let lim = array![[-600., 600.]];
        let xlimits = lim.broadcast((dim, 2)).unwrap();
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Lhs::new(&xlimits).sample(nt, &mut rng);
        let mut yt: Array1<f64> = Array1::zeros(xt.nrows());
        Zip::from(&mut yt).and(xt.rows()).par_for_each(|y, x| {
            *y = griewank(&x.to_owned());
        });

        group.bench_function(format!("gp sqexp {dim}"), |b| {
            b.iter(|| {
                std::hint::black_box(
                    GaussianProcess::<f64, ConstantMean, SquaredExponentialCorr>::params(
                        ConstantMean::default(),
                        SquaredExponentialCorr::default(),
                    )
                    .fit(&Dataset::new(xt.to_owned(), yt.to_owned()))
                    .expect("GP fit error"),
                )
            });
        });
        group.bench_function(format!("gp matern52 {dim}"), |b| {
            b.iter(|| {
                std::hint::black_box(
                    GaussianProcess::<f64, ConstantMean, Matern52Corr>::params(
                        ConstantMean::default(),
                        Matern52Corr::default(),
                    )
                    .nugget(1e-6)
                    .fit(&Dataset::new(xt.to_owned(), yt.to_owned()))
                    .expect("GP fit error"),
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_gp);
criterion_main!(benches);
