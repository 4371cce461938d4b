//! Agents and the pieces they are built from: the fixed-topology network,
//! the exploration schedule, and masked move selection.

mod agent;
pub mod exploration;
pub mod move_selection;
pub mod network;

pub use agent::{Agent, Origin};
pub use exploration::ExplorationSchedule;
pub use move_selection::{choose_move, masked_argmax, random_legal_column, MoveChoice};
pub use network::{Activation, Network, NetworkConfig, HIDDEN, INPUTS, OUTPUTS, TOTAL_WEIGHTS};
