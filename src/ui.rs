//! Seams between the session layer and whatever renders the application.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store never touches a router or a toast widget directly. The
//! composing UI layer hands it a [`Navigator`] and a [`Notifier`].

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    /// Move the application to `path` (e.g. `/`).
    fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: ToastKind::Error, message: message.into() }
    }
}

/// Displays toasts.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}
