// src/ui/notifications.rs
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, RichText};

use crate::state::{Notification, NotificationLevel};

const TOAST_LIFETIME: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 3;

struct Toast {
    notification: Notification,
    shown_at: Instant,
}

/// Short-lived notifications stacked in the bottom-right corner.
#[derive(Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    fn push_at(&mut self, notification: Notification, now: Instant) {
        self.items.push(Toast { notification, shown_at: now });
        if self.items.len() > MAX_TOASTS {
            self.items.remove(0);
        }
    }

    fn prune(&mut self, now: Instant) {
        self.items
            .retain(|toast| now.duration_since(toast.shown_at) < TOAST_LIFETIME);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.prune(Instant::now());
        if self.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Window::new("notifications")
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
            .show(ctx, |ui| {
                ui.set_max_width(280.0);
                for (index, toast) in self.items.iter().enumerate() {
                    let (icon, color) = match toast.notification.level {
                        NotificationLevel::Info => ("ℹ", Color32::LIGHT_BLUE),
                        NotificationLevel::Success => ("✔", super::ACCENT),
                        NotificationLevel::Error => ("⚠", super::DANGER),
                    };

                    let response = ui
                        .vertical(|ui| {
                            ui.label(
                                RichText::new(format!("{icon} {}", toast.notification.title))
                                    .strong()
                                    .color(color),
                            );
                            if !toast.notification.message.is_empty() {
                                ui.label(&toast.notification.message);
                            }
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() {
                        dismissed = Some(index);
                    }
                    ui.separator();
                }
            });

        if let Some(index) = dismissed {
            self.items.remove(index);
        }

        // keep frames coming so toasts expire without user input
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str) -> Notification {
        Notification::new(NotificationLevel::Info, title, "")
    }

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let start = Instant::now();
        let mut toasts = Toasts::new();
        toasts.push_at(note("first"), start);
        toasts.push_at(note("second"), start + Duration::from_secs(2));

        toasts.prune(start + Duration::from_secs(3));
        assert_eq!(toasts.items.len(), 2);

        toasts.prune(start + Duration::from_secs(5));
        assert_eq!(toasts.items.len(), 1);
        assert_eq!(toasts.items[0].notification.title, "second");

        toasts.prune(start + Duration::from_secs(7));
        assert!(toasts.is_empty());
    }

    #[test]
    fn only_the_newest_toasts_are_kept() {
        let now = Instant::now();
        let mut toasts = Toasts::new();
        for title in ["a", "b", "c", "d"] {
            toasts.push_at(note(title), now);
        }
        assert_eq!(toasts.items.len(), MAX_TOASTS);
        assert_eq!(toasts.items[0].notification.title, "b");
    }
}
