//! Active tool tracking and camera input gating.
//!
//! Camera drags and brush strokes share the same pointer, so the tool decides
//! which of them receives input. Orbit and Pan hand the pointer to the camera
//! controller; every other tool takes it away.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::history::SnapshotKind;

/// Tool selected in the viewport toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Rotate the camera around its target
    #[default]
    Orbit,
    /// Translate the camera
    Pan,
    /// Paint vertices with the paint color
    Paint,
    /// Paint vertices back to the baseline color
    Erase,
    /// Place the hot spot on pointer release
    HotSpotPlace,
}

impl ToolMode {
    /// Check if this tool writes vertex colors
    pub fn paints(self) -> bool {
        matches!(self, ToolMode::Paint | ToolMode::Erase)
    }

    /// History tag for gestures made with this tool
    pub fn snapshot_kind(self) -> Option<SnapshotKind> {
        match self {
            ToolMode::Paint => Some(SnapshotKind::Paint),
            ToolMode::Erase => Some(SnapshotKind::Erase),
            _ => None,
        }
    }

    /// Camera controller settings while this tool is active
    pub fn camera_input(self) -> CameraInput {
        match self {
            ToolMode::Orbit => CameraInput {
                enabled: true,
                rotate: true,
                pan: false,
            },
            ToolMode::Pan => CameraInput {
                enabled: true,
                rotate: false,
                pan: true,
            },
            ToolMode::Paint | ToolMode::Erase | ToolMode::HotSpotPlace => CameraInput::DISABLED,
        }
    }
}

/// Which pointer interactions the camera controller should capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInput {
    /// Controller receives pointer input at all
    pub enabled: bool,
    /// Drag rotates around the target
    pub rotate: bool,
    /// Drag translates the camera
    pub pan: bool,
}

impl CameraInput {
    pub const DISABLED: CameraInput = CameraInput {
        enabled: false,
        rotate: false,
        pan: false,
    };
}

/// Tool state machine.
///
/// Every tool is reachable from every other; switching is unguarded.
#[derive(Debug, Default)]
pub struct ToolStateMachine {
    mode: ToolMode,
}

impl ToolStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch tools and return the camera input settings to apply.
    pub fn set(&mut self, mode: ToolMode) -> CameraInput {
        if mode != self.mode {
            info!("Tool changed: {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
        self.camera_input()
    }

    pub fn camera_input(&self) -> CameraInput {
        self.mode.camera_input()
    }
}
