//! Starter content written on first run.

use tally_types::{LevelTier, Reward, Task};

pub fn default_tasks() -> Vec<Task> {
    vec![
        Task::with_id("t_read", "Read for 30 minutes", 20),
        Task::with_id("t_workout", "Work out", 25),
        Task::with_id("t_deepwork", "Two hours of deep work", 40),
        Task::with_id("t_plan", "Plan tomorrow", 15),
        Task::with_id("t_sleep", "In bed before 11pm", 50),
    ]
}

pub fn default_rewards() -> Vec<Reward> {
    vec![
        Reward::with_id("r_coffee", "Fancy coffee", 80, "A treat from the good cafe"),
        Reward::with_id("r_game", "One hour of games", 120, "Guilt-free gaming session"),
        Reward::with_id("r_outing", "Day out", 300, "A trip somewhere new"),
    ]
}

pub fn default_levels() -> Vec<LevelTier> {
    vec![
        LevelTier::with_id("lv_bronze", "Bronze", 500, 5),
        LevelTier::with_id("lv_silver", "Silver", 1000, 5),
        LevelTier::with_id("lv_gold", "Gold", 2000, 5),
        LevelTier::with_id("lv_platinum", "Platinum", 4000, 4),
    ]
}
