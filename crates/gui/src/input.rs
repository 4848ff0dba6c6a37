//! Host-independent input events fed to the measuring tool

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    X,
    Y,
    Z,
    Escape,
    Enter,
    /// Any key the tool has no binding for
    Other,
}

impl Key {
    /// Axis index (0 = X, 1 = Y, 2 = Z) for the axis-lock keys
    pub fn axis(self) -> Option<usize> {
        match self {
            Key::X => Some(0),
            Key::Y => Some(1),
            Key::Z => Some(2),
            _ => None,
        }
    }
}

/// Screen area an event happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The 3D view the tool works in
    Viewport,
    /// Property/side panel next to the viewport
    SidePanel,
    /// Any other recognized host area (menus, status bar)
    OtherArea,
    /// Outside every known region
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    PointerMoved,
    PointerPressed(PointerButton),
    PointerReleased(PointerButton),
    KeyPressed(Key),
    KeyReleased(Key),
    Wheel { delta: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    /// Pointer position in window pixels
    pub position: Vec2,
    pub region: Region,
    /// Host clock in seconds
    pub time: f64,
}

impl InputEvent {
    pub fn new(kind: InputKind, position: Vec2, region: Region, time: f64) -> Self {
        Self {
            kind,
            position,
            region,
            time,
        }
    }

    pub fn in_viewport(&self) -> bool {
        self.region == Region::Viewport
    }
}

/// What the host should do with an event after the tool saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Handled; the host must not process it further
    Consumed,
    /// Not for the tool; the host handles it normally
    PassThrough,
    /// Session ended by confirmation
    Finished,
    /// Session ended by cancellation
    Cancelled,
}

impl EventResponse {
    pub fn ends_session(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}
