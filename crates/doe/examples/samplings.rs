use feasample_doe::{Lhs, Random, SamplingMethod};
use ndarray::arr2;

fn main() {
    let xlimits = arr2(&[[0., 1.], [-10., 10.], [5., 15.]]);
    let n = 10;

    println!("Take {n} samples in");
    println!("{xlimits}\n");

    println!("*** using random sampling");
    let samples = Random::new(&xlimits).sample(n).expect("random samples");
    println!("{samples}\n");

    println!("*** using latin hypercube sampling with loose spacing");
    let samples = Lhs::new(&xlimits)
        .ratio(0.2)
        .sample(n)
        .expect("LHS samples");
    println!("{samples}\n");

    println!("*** using space-filling latin hypercube sampling");
    let design = Lhs::new(&xlimits).design(n).expect("LHS design");
    println!(
        "min distance {:?} reached after {} restarts",
        design.min_distance, design.restarts
    );
    println!("{}\n", design.samples);
}
