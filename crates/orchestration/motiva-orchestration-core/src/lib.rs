//! Motiva orchestration core (engine-agnostic)
//!
//! Turns declarative animation intent — explicit value targets or named
//! variants resolved against ancestor tables — into a scheduled set of
//! per-value animation instructions: variant resolution, propagation
//! through transparent wrapper nodes, stagger scheduling over flattened
//! sibling sequences, per-channel animation driving, and change-gated
//! update/completion events. Rendering, host bindings and style parsing
//! live in adapter layers.

pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod propagate;
pub mod props;
pub mod resolve;
pub mod schedule;
pub mod transition;

// Re-exports for consumers (adapters)
pub use channel::{StepOutcome, ValueChannel};
pub use config::Config;
pub use engine::{Engine, Node};
pub use error::EngineError;
pub use gate::ChangeGate;
pub use ids::{IdAllocator, NodeId};
pub use outputs::{Change, Event, Outputs};
pub use propagate::{flatten_leaves, is_transparent, TreeView};
pub use props::{AnimationIntent, NodeProps, TargetDef, VariantTable};
pub use resolve::{resolve_intent, resolve_labels, ResolvedTarget};
pub use schedule::{stagger_delay, Orchestration};
pub use transition::{Ease, StaggerDirection, TransitionKind, TransitionSpec};
pub use motiva_api_core::{Value, ValueKind, ValueMap};
