pub mod assembler;
pub mod candidate;
pub mod session;

pub use assembler::assemble_match_groups;
pub use candidate::find_matches_at;
pub use glossa_index::{build_grouped_index, GroupedIndex};
pub use session::{MatchSession, RequestTicket, SessionStats};
