use ferrite_backprop::{Dataset, NetworkConfig, TaskType, TrainingDriver};

fn main() -> ferrite_backprop::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = NetworkConfig::new(2, 6, 1, 0.05, TaskType::Classification).with_seed(7);
    let mut driver = TrainingDriver::from_config(config, Dataset::xor())?;

    let steps = 60_000;
    for step in 0..steps {
        let record = driver.step()?;
        if step % 10_000 == 0 {
            println!("Step {step}: loss = {:.6}", record.backward.loss);
        }
    }
    println!("Mean loss after {steps} steps: {:.6}", driver.mean_loss()?);

    for example in driver.dataset().examples() {
        let output = driver.network().predict(&example.inputs)?;
        println!("Input: {:?} -> Output: {:.4}", example.inputs, output[0]);
    }

    if let Some(record) = driver.last_record() {
        println!("\nLast step record:");
        println!("{}", serde_json::to_string_pretty(record).map_err(ferrite_backprop::NetworkError::from)?);
    }
    Ok(())
}
