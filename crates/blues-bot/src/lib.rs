pub mod bot;
pub mod policy;

pub use bot::{BotConfig, BotPlayer, Strategy};
pub use policy::{
    Approach, ApproachPolicy, CardMemory, Counting, DecisionPolicy, PursuitPolicy, Recall,
};
