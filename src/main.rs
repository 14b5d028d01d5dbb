mod cli;

use backprop_mlp::{load_from_path, TrainingDriver};
use rand::{rngs::StdRng, SeedableRng};

fn main() {
    let cli = cli::init();
    let dataset = load_from_path(&cli.input_file).unwrap_or_else(|e| cli::fail(e));

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let driver = TrainingDriver::new(dataset, cli.train_config(), &mut rng);
    let report = driver.run(|stats| println!("{stats}"));

    println!();
    print!("{report}");
    if cli.show_validation {
        println!();
        println!("All Validation Set Results:");
        for record in &report.validation_records {
            println!("{record}");
        }
    }

    if let Some(path) = &cli.report {
        if let Err(e) = report.save_json(path) {
            cli::fail(format!("Failed to write report to {:?}: {}", path, e));
        }
    }
}
