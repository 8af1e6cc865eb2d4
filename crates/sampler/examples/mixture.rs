use feasample::{Constraint, FnConstraint, LinearConstraints, SamplerBuilder, SamplingMode};
use ndarray::{array, Axis};

fn main() {
    let env = env_logger::Env::new().filter_or("FEASAMPLE_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    // Three components formulation: x1 + x2 + x3 <= 1
    let mixture = LinearConstraints::mixture(3, 1.).expect("mixture constraints");
    let res = SamplerBuilder::sample(&mixture)
        .configure(|config| config.n_results(200).seed(42))
        .build()
        .expect("sampler built")
        .run()
        .expect("mixture samples");
    println!(
        "{} mixture samples, {} stratified trials, {} walk trials",
        res.candidates.nrows(),
        res.trials,
        res.walk_trials
    );
    println!("mean = {}", res.candidates.mean_axis(Axis(0)).expect("samples"));
    assert!(res.candidates.rows().into_iter().all(|x| mixture.apply(&x).unwrap_or(false)));

    // Annulus around the center of the unit square
    let annulus = FnConstraint::new(array![0.8, 0.5], |x| {
        let r2 = (x[0] - 0.5).powi(2) + (x[1] - 0.5).powi(2);
        (0.01..0.25).contains(&r2)
    });
    let res = SamplerBuilder::sample(annulus)
        .configure(|config| config.n_results(100).n_freq(20).seed(42))
        .build()
        .expect("sampler built")
        .run()
        .expect("annulus samples");
    let mode = match res.mode {
        SamplingMode::Stratified => "stratified",
        SamplingMode::Walk => "walk",
    };
    println!(
        "{} annulus samples in {} trials, {} mode",
        res.candidates.nrows(),
        res.trials + res.walk_trials,
        mode
    );
}
