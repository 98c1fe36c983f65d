use std::{error::Error, fs, path::Path};

use binned_q::{
    algo::{QTableAgent, QTableAgentConfig},
    env::Environment,
    gym::MountainCar,
    train::{evaluate, TrainConfig, Trainer},
};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let path = Path::new("demos/q_table_mountain_car");

    let mut env = MountainCar::new();
    let mut agent: QTableAgent<2> = QTableAgent::new(&env, QTableAgentConfig::default())?;
    let trainer = Trainer::new(TrainConfig::default())?;

    let outcome = trainer.run(&mut agent, &mut env);
    let test_reward = evaluate(&outcome.policy, &mut env);
    env.close();

    fs::create_dir_all(path.join("out"))?;

    let mut wtr = csv::Writer::from_path(path.join("out/rewards.csv"))?;
    wtr.write_record(["episode", "reward"])?;
    for (i, reward) in outcome.rewards.iter().enumerate() {
        wtr.write_record([i.to_string(), reward.to_string()])?;
    }
    wtr.flush()?;

    log::info!(
        "{} after {} episodes, best reward {}, greedy test reward {}",
        if outcome.solved { "solved" } else { "stopped" },
        outcome.episodes(),
        outcome.best_reward,
        test_reward,
    );

    Ok(())
}
