//! Gesture interaction session: one finger drags a piece, a second finger's
//! vertical swipe rotates it about its center.
//!
//! The session is deliberately DOM-free. The event wiring feeds it plain
//! contact records and applies the transform writes it returns, so every
//! gesture rule here is testable without a browser.

use crate::transform::PieceTransform;

/// Minimum distance from the start point before a drag takes effect.
/// Filters out finger jitter so a stationary hold never nudges a piece.
pub const DRAG_DEADZONE_PX: f64 = 2.0;

/// Degrees of rotation per pixel of vertical movement of the second finger.
/// Downward movement rotates clockwise.
pub const ROTATE_DEG_PER_PX: f64 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactPoint {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug)]
pub struct PrimaryContact {
    pub id: i32,
    pub piece: usize,
    pub start_x: f64,
    pub start_y: f64,
    pub last_x: f64,
    pub last_y: f64,
    pub origin: PieceTransform,
    pub moved: bool,
    pub pending_angle: Option<f64>,
}

impl PrimaryContact {
    fn current_angle(&self) -> f64 {
        self.pending_angle.unwrap_or(self.origin.angle)
    }

    fn dragged_translation(&self) -> (f64, f64) {
        if self.moved {
            (
                self.origin.tx + (self.last_x - self.start_x),
                self.origin.ty + (self.last_y - self.start_y),
            )
        } else {
            (self.origin.tx, self.origin.ty)
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RotationContact {
    pub id: i32,
    pub start_y: f64,
    pub base_angle: f64,
}

/// A transform to apply to the piece at `piece` in the index captured when
/// the gesture started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformWrite {
    pub piece: usize,
    pub transform: PieceTransform,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEnd {
    /// The primary contact released; the whole gesture is over.
    Gesture,
    /// Only the rotation contact released; the drag continues.
    Rotation,
}

/// At most one primary and one rotation contact exist at a time, and a
/// rotation contact only while a primary does.
#[derive(Debug, Default)]
pub struct GestureSession {
    primary: Option<PrimaryContact>,
    rotation: Option<RotationContact>,
}

impl GestureSession {
    pub fn has_contacts(&self) -> bool {
        self.primary.is_some()
    }

    pub fn dragging(&self) -> bool {
        self.primary.is_some()
    }

    pub fn rotating(&self) -> bool {
        self.rotation.is_some()
    }

    /// Claims `contact` as the primary (drag) contact over `piece`, whose
    /// transform parsed to `origin`. Refused while another drag is live.
    pub fn begin_drag(&mut self, contact: ContactPoint, piece: usize, origin: PieceTransform) -> bool {
        if self.primary.is_some() {
            return false;
        }
        self.primary = Some(PrimaryContact {
            id: contact.id,
            piece,
            start_x: contact.x,
            start_y: contact.y,
            last_x: contact.x,
            last_y: contact.y,
            origin,
            moved: false,
            pending_angle: None,
        });
        true
    }

    /// Claims `contact` as the rotation contact, baselined to the primary's
    /// current angle. Any contact point qualifies; it does not need to hit a
    /// piece. Refused without a live drag or while a rotation is live.
    pub fn begin_rotation(&mut self, contact: ContactPoint) -> bool {
        if self.rotation.is_some() {
            return false;
        }
        let Some(primary) = self.primary.as_ref() else {
            return false;
        };
        self.rotation = Some(RotationContact {
            id: contact.id,
            start_y: contact.y,
            base_angle: primary.current_angle(),
        });
        true
    }

    /// Advances whichever tracked contact `contact` belongs to and returns
    /// the transform write to apply, if any. Untracked contacts are ignored.
    pub fn contact_move(&mut self, contact: ContactPoint) -> Option<TransformWrite> {
        let primary = self.primary.as_mut()?;

        if contact.id == primary.id {
            primary.last_x = contact.x;
            primary.last_y = contact.y;
            let dx = contact.x - primary.start_x;
            let dy = contact.y - primary.start_y;
            if !primary.moved && (dx * dx + dy * dy).sqrt() < DRAG_DEADZONE_PX {
                return None;
            }
            primary.moved = true;
            return Some(TransformWrite {
                piece: primary.piece,
                transform: PieceTransform {
                    tx: primary.origin.tx + dx,
                    ty: primary.origin.ty + dy,
                    angle: primary.current_angle(),
                    cx: primary.origin.cx,
                    cy: primary.origin.cy,
                },
            });
        }

        let rotation = self.rotation.as_mut()?;
        if contact.id != rotation.id {
            return None;
        }
        let angle = rotation.base_angle + (contact.y - rotation.start_y) * ROTATE_DEG_PER_PX;
        primary.pending_angle = Some(angle);
        let (tx, ty) = primary.dragged_translation();
        Some(TransformWrite {
            piece: primary.piece,
            transform: PieceTransform {
                tx,
                ty,
                angle,
                cx: primary.origin.cx,
                cy: primary.origin.cy,
            },
        })
    }

    /// Releases the contact with `id`. Releasing the primary ends the whole
    /// gesture, rotation included; releasing the rotation contact commits
    /// its angle into the drag baseline so the drag continues from there.
    /// Cancellation takes the same path.
    pub fn contact_end(&mut self, id: i32) -> Option<ContactEnd> {
        if self.primary.as_ref().is_some_and(|p| p.id == id) {
            self.primary = None;
            self.rotation = None;
            return Some(ContactEnd::Gesture);
        }
        if self.rotation.as_ref().is_some_and(|r| r.id == id) {
            self.rotation = None;
            if let Some(primary) = self.primary.as_mut() {
                if let Some(angle) = primary.pending_angle.take() {
                    primary.origin.angle = angle;
                }
            }
            return Some(ContactEnd::Rotation);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> PieceTransform {
        PieceTransform {
            tx: 40.0,
            ty: 60.0,
            angle: 10.0,
            cx: 48.0,
            cy: 48.0,
        }
    }

    fn contact(id: i32, x: f64, y: f64) -> ContactPoint {
        ContactPoint { id, x, y }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9,
            "expected {expected} got {actual}"
        );
    }

    #[test]
    fn drag_below_deadzone_produces_no_write() {
        let mut session = GestureSession::default();
        assert!(session.begin_drag(contact(1, 100.0, 100.0), 0, origin()));
        assert_eq!(session.contact_move(contact(1, 101.0, 101.0)), None);
        assert_eq!(session.contact_move(contact(1, 101.9, 100.0)), None);
    }

    #[test]
    fn drag_at_deadzone_writes_exact_pixel_delta() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 3, origin());
        let write = session
            .contact_move(contact(1, 102.0, 100.0))
            .expect("threshold reached");
        assert_eq!(write.piece, 3);
        assert_close(write.transform.tx, 42.0);
        assert_close(write.transform.ty, 60.0);
        assert_close(write.transform.angle, 10.0);
        assert_eq!((write.transform.cx, write.transform.cy), (48.0, 48.0));
    }

    #[test]
    fn moved_latch_is_permanent_for_the_contact() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 0, origin());
        assert!(session.contact_move(contact(1, 103.0, 100.0)).is_some());
        // Back inside the deadzone radius: still tracked, still written.
        let write = session
            .contact_move(contact(1, 100.5, 100.0))
            .expect("latch stays set");
        assert_close(write.transform.tx, 40.5);
    }

    #[test]
    fn ten_pixels_of_vertical_swipe_rotates_three_and_a_half_degrees() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 0, origin());
        assert!(session.begin_rotation(contact(2, 300.0, 50.0)));
        let write = session
            .contact_move(contact(2, 300.0, 60.0))
            .expect("rotation write");
        assert_close(write.transform.angle, 13.5);
        // Untouched drag: translation stays at the origin.
        assert_close(write.transform.tx, 40.0);
        assert_close(write.transform.ty, 60.0);
    }

    #[test]
    fn upward_swipe_rotates_counter_clockwise() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 0, origin());
        session.begin_rotation(contact(2, 300.0, 50.0));
        let write = session
            .contact_move(contact(2, 300.0, 30.0))
            .expect("rotation write");
        assert_close(write.transform.angle, 10.0 - 20.0 * ROTATE_DEG_PER_PX);
    }

    #[test]
    fn drag_and_rotation_compose_independently() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 0, origin());
        session.contact_move(contact(1, 110.0, 105.0));
        session.begin_rotation(contact(2, 300.0, 50.0));
        let write = session
            .contact_move(contact(2, 300.0, 70.0))
            .expect("rotation write");
        assert_close(write.transform.tx, 50.0);
        assert_close(write.transform.ty, 65.0);
        assert_close(write.transform.angle, 17.0);
        // The drag keeps moving under the live rotation override.
        let write = session
            .contact_move(contact(1, 120.0, 100.0))
            .expect("drag write");
        assert_close(write.transform.tx, 60.0);
        assert_close(write.transform.angle, 17.0);
    }

    #[test]
    fn releasing_primary_ends_both_contacts() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 0, origin());
        session.begin_rotation(contact(2, 300.0, 50.0));
        session.contact_move(contact(2, 300.0, 60.0));
        assert_eq!(session.contact_end(1), Some(ContactEnd::Gesture));
        assert!(!session.has_contacts());
        assert!(!session.rotating());
        assert_eq!(session.contact_move(contact(2, 300.0, 80.0)), None);
        assert_eq!(session.contact_end(2), None);
    }

    #[test]
    fn releasing_rotation_commits_angle_and_keeps_the_drag() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 0, origin());
        session.begin_rotation(contact(2, 300.0, 50.0));
        session.contact_move(contact(2, 300.0, 60.0));
        assert_eq!(session.contact_end(2), Some(ContactEnd::Rotation));
        assert!(session.dragging());
        assert!(!session.rotating());
        // Subsequent drag writes carry the committed 13.5 degrees.
        let write = session
            .contact_move(contact(1, 104.0, 100.0))
            .expect("drag write");
        assert_close(write.transform.angle, 13.5);
        assert_close(write.transform.tx, 44.0);
    }

    #[test]
    fn next_rotation_baselines_from_the_committed_angle() {
        let mut session = GestureSession::default();
        session.begin_drag(contact(1, 100.0, 100.0), 0, origin());
        session.begin_rotation(contact(2, 300.0, 50.0));
        session.contact_move(contact(2, 300.0, 60.0));
        session.contact_end(2);
        session.begin_rotation(contact(3, 280.0, 90.0));
        let write = session
            .contact_move(contact(3, 280.0, 100.0))
            .expect("rotation write");
        assert_close(write.transform.angle, 17.0);
    }

    #[test]
    fn contacts_beyond_the_two_roles_are_ignored() {
        let mut session = GestureSession::default();
        assert!(session.begin_drag(contact(1, 100.0, 100.0), 0, origin()));
        assert!(!session.begin_drag(contact(2, 120.0, 100.0), 1, origin()));
        assert!(session.begin_rotation(contact(2, 120.0, 100.0)));
        assert!(!session.begin_rotation(contact(3, 140.0, 100.0)));
        assert_eq!(session.contact_move(contact(3, 140.0, 140.0)), None);
    }

    #[test]
    fn rotation_requires_a_live_drag() {
        let mut session = GestureSession::default();
        assert!(!session.begin_rotation(contact(2, 120.0, 100.0)));
        assert_eq!(session.contact_move(contact(2, 120.0, 140.0)), None);
    }
}
