pub mod app;
pub mod collab;
pub mod config;
pub mod dispatch;
pub mod menu;
pub mod navigator;
pub mod registry;
pub mod selector;
pub mod session;
mod telemetry;

pub use app::logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
    set_log_frame_time,
};
pub use collab::{
    InputFrame, InputSource, KeyboardCollaborator, KeyboardJob, KeyboardMessage, KeyboardPoll,
    TransformConnection,
};
pub use menu::{MenuState, MenuStateMachine, MenuView};
pub use registry::{Category, CategoryId, CategoryMode, OptionRegistry, PromptOption};
pub use selector::{ModelSelector, ProcessingMode};
pub use session::{PromptSession, TickReport};
pub use telemetry::{init_tracing, trace_sink, TraceSink};
