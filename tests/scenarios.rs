// End-to-end learning scenarios: XOR, a noisy line, and one hand-checked step.

use approx::assert_abs_diff_eq;
use ferrite_backprop::{
    Dataset, DatasetKind, Network, NetworkConfig, NetworkParams, TaskType, TrainingDriver,
};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[test]
fn xor_classification_learns_the_truth_table() {
    // Per-example descent at 0.05 needs tens of thousands of steps to leave
    // the XOR plateau from ±0.25 initialisation.
    for seed in [7, 11, 23] {
        let config = NetworkConfig::new(2, 6, 1, 0.05, TaskType::Classification).with_seed(seed);
        let mut driver = TrainingDriver::from_config(config, Dataset::xor()).unwrap();
        driver.run(60_000).unwrap();

        let net = driver.network();
        let p = |x: [f64; 2]| net.predict(&x).unwrap()[0];
        assert!(p([0.0, 1.0]) > 0.5, "seed {seed}: [0,1] -> {}", p([0.0, 1.0]));
        assert!(p([1.0, 0.0]) > 0.5, "seed {seed}: [1,0] -> {}", p([1.0, 0.0]));
        assert!(p([0.0, 0.0]) < 0.5, "seed {seed}: [0,0] -> {}", p([0.0, 0.0]));
        assert!(p([1.0, 1.0]) < 0.5, "seed {seed}: [1,1] -> {}", p([1.0, 1.0]));
    }
}

#[test]
fn xor_loss_falls_from_its_starting_value() {
    let config = NetworkConfig::new(2, 6, 1, 0.05, TaskType::Classification).with_seed(11);
    let mut driver = TrainingDriver::from_config(config, Dataset::xor()).unwrap();
    let start = driver.mean_loss().unwrap();
    driver.run(60_000).unwrap();
    assert!(driver.mean_loss().unwrap() < start);
}

#[test]
fn linear_regression_loss_drops_over_500_steps() {
    for seed in [3, 8, 21] {
        let dataset = DatasetKind::Linear { samples: 20, slope: 1.8, intercept: 0.5, noise: 0.1, seed: Some(seed) }
            .build()
            .unwrap();
        let config = NetworkConfig::new(1, 2, 1, 0.05, TaskType::Regression).with_seed(seed);
        let mut driver = TrainingDriver::from_config(config, dataset).unwrap();

        driver.step().unwrap();
        let after_one = driver.mean_loss().unwrap();
        driver.run(499).unwrap();
        let after_500 = driver.mean_loss().unwrap();

        assert_eq!(driver.step_count(), 500);
        assert!(after_500 < after_one, "seed {seed}: {after_500} !< {after_one}");
    }
}

#[test]
fn single_step_matches_hand_computation() {
    let lr = 0.5;
    let config = NetworkConfig::new(2, 1, 1, lr, TaskType::Classification);
    let mut net = Network::with_params(config, NetworkParams::filled(2, 1, 1, 0.1)).unwrap();

    let record = net.train_step(&[1.0, 0.0], &[1.0]).unwrap();

    // hiddenPre = 0.1·1 + 0.1·0 + 0.1
    let h = sigmoid(0.2);
    let y = sigmoid(0.1 * h + 0.1);
    let output_grad = y - 1.0;
    let hidden_grad = output_grad * 0.1 * h * (1.0 - h);

    let b = &record.backward;
    assert_abs_diff_eq!(record.forward.hidden_pre[0], 0.2, epsilon = 1e-12);
    assert_abs_diff_eq!(record.forward.hidden_post[0], 0.549833997312478, epsilon = 1e-9);
    assert_abs_diff_eq!(record.forward.output_pre[0], 0.1549833997312478, epsilon = 1e-9);
    assert_abs_diff_eq!(record.forward.output_post[0], 0.5386684799635422, epsilon = 1e-9);

    assert_abs_diff_eq!(b.loss, -y.ln(), epsilon = 1e-9);
    assert_abs_diff_eq!(b.loss, 0.6186549623059199, epsilon = 1e-9);
    assert_abs_diff_eq!(b.output_gradients[0], output_grad, epsilon = 1e-9);
    assert_abs_diff_eq!(b.output_gradients[0], -0.46133152003645783, epsilon = 1e-9);
    assert_abs_diff_eq!(b.hidden_gradients[0], hidden_grad, epsilon = 1e-9);
    assert_abs_diff_eq!(b.hidden_gradients[0], -0.01141871967233768, epsilon = 1e-9);

    assert_abs_diff_eq!(b.weights2_gradients.data[0][0], h * output_grad, epsilon = 1e-9);
    assert_abs_diff_eq!(b.weights1_gradients.data[0][0], hidden_grad, epsilon = 1e-9);
    assert_eq!(b.weights1_gradients.data[1][0], 0.0);

    let a = &record.after;
    assert_abs_diff_eq!(a.weights2.data[0][0], 0.22682787687394357, epsilon = 1e-9);
    assert_abs_diff_eq!(a.weights1.data[0][0], 0.10570935983616885, epsilon = 1e-9);
    assert_eq!(a.weights1.data[1][0], 0.1);
    assert_abs_diff_eq!(a.biases1[0], 0.10570935983616885, epsilon = 1e-9);
    assert_abs_diff_eq!(a.biases2[0], 0.3306657600182289, epsilon = 1e-9);
}

#[test]
fn single_regression_step_matches_hand_computation() {
    let lr = 0.1;
    let config = NetworkConfig::new(1, 1, 1, lr, TaskType::Regression);
    let mut net = Network::with_params(config, NetworkParams::filled(1, 1, 1, 0.0)).unwrap();

    let record = net.train_step(&[2.0], &[1.0]).unwrap();

    // all-zero parameters: hidden = σ(0) = 0.5, output = 0
    assert_eq!(record.forward.hidden_post, vec![0.5]);
    assert_eq!(record.forward.output_post, vec![0.0]);
    assert_eq!(record.backward.loss, 0.5);
    assert_eq!(record.backward.output_gradients, vec![-1.0]);
    // weights2 is zero, so nothing reaches the hidden layer
    assert_eq!(record.backward.hidden_gradients, vec![0.0]);
    assert_eq!(record.after.weights2.data[0][0], 0.05);
    assert_eq!(record.after.biases2[0], 0.1);
    assert_eq!(record.after.weights1.data[0][0], 0.0);
}
