use ndarray::arr2;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use smbox_doe::{
    display_point, initial_design, Dimension, InitialDesign, Lhs, LhsKind, Random,
    SamplingMethod, Space,
};

fn main() {
    let mut rng = Xoshiro256Plus::seed_from_u64(42);
    let xlimits = arr2(&[[0., 1.], [-10., 10.], [5., 15.]]);
    let n = 10;

    println!("Take {n} samples in");
    println!("{xlimits}\n");

    println!("*** using random sampling");
    let samples = Random::new(&xlimits).sample(n, &mut rng);
    println!("{samples}\n");

    println!("*** using centered latin hypercube sampling");
    let samples = Lhs::new(&xlimits)
        .kind(LhsKind::Centered)
        .sample(n, &mut rng);
    println!("{samples}\n");

    println!("*** using maximin latin hypercube sampling");
    let samples = Lhs::new(&xlimits).sample(n, &mut rng);
    println!("{samples}\n");

    let space = Space::new(vec![
        Dimension::log_real(1e-3, 1.).expect("valid dimension"),
        Dimension::integer(1, 10).expect("valid dimension"),
        Dimension::categorical(["linear", "rbf", "poly"]).expect("valid dimension"),
    ])
    .expect("valid space");
    println!("*** initial design in a mixed space");
    let points = initial_design(&space, n, InitialDesign::Lhs(LhsKind::Maximin), &mut rng)
        .expect("valid design");
    for p in points {
        println!("{}", display_point(&p));
    }
}
