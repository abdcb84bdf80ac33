pub mod board;
pub mod domain;
pub mod matching;
pub mod membership;
pub mod ports;

pub use board::BoardColumns;
pub use domain::{
    AuthSession, DomainError, DomainResult, Project, ProjectStatus, Task, TaskPriority,
    TaskStatus, User, UserCredentials,
};
pub use matching::{CollaboratorMatch, ProjectMatch};
pub use ports::{PortError, PortResult, RecordStore};
