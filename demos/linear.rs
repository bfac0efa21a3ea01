use ferrite_backprop::{DatasetKind, NetworkConfig, TaskType, TrainingDriver};

fn main() -> ferrite_backprop::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let dataset = DatasetKind::Linear { samples: 20, slope: 1.8, intercept: 0.5, noise: 0.1, seed: Some(3) }.build()?;
    let config = NetworkConfig::new(1, 2, 1, 0.05, TaskType::Regression).with_seed(3);
    let mut driver = TrainingDriver::from_config(config, dataset)?;

    driver.step()?;
    let after_one = driver.mean_loss()?;
    driver.run(499)?;
    let after_500 = driver.mean_loss()?;
    println!("Mean loss after 1 step:    {after_one:.6}");
    println!("Mean loss after 500 steps: {after_500:.6}");

    for x in [-1.0, 0.0, 1.0] {
        let y = driver.network().predict(&[x])?[0];
        println!("x = {x:>4.1} -> y = {y:.4}  (line: {:.4})", 1.8 * x + 0.5);
    }
    Ok(())
}
