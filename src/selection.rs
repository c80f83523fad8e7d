//! Pointer-drag selection over the page viewport
//!
//! The render layer forwards pointer down/move/up events here while
//! annotation mode is on. A finished, non-degenerate drag arms the creation
//! menu; the creation flow then consumes the finalized rectangle.

use thiserror::Error;

use crate::geometry::{Point, Rect};

/// Vertical distance between the creation menu anchor and the selection's top edge
pub const MENU_VERTICAL_OFFSET: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("annotation mode is disabled")]
    AnnotationModeDisabled,
    #[error("no selection drag in progress")]
    NotDragging,
}

/// Armed creation menu, positioned in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreationMenu {
    pub anchor: Point,
}

impl CreationMenu {
    fn above(rect: &Rect) -> Self {
        Self {
            anchor: Point::new(rect.x, (rect.y - MENU_VERTICAL_OFFSET).max(0.0)),
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionEngine {
    annotation_mode: bool,
    dragging: bool,
    start: Option<Point>,
    end: Option<Point>,
    rect: Option<Rect>,
    menu: Option<CreationMenu>,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annotation_mode(&self) -> bool {
        self.annotation_mode
    }

    /// Switching annotation mode off drops any drag or armed menu.
    pub fn set_annotation_mode(&mut self, enabled: bool) {
        tracing::debug!(enabled, "annotation mode");
        self.annotation_mode = enabled;
        if !enabled {
            self.clear();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Live or finalized rectangle, `None` when nothing is selected
    pub fn normalized_rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn menu(&self) -> Option<CreationMenu> {
        self.menu
    }

    /// Rectangle ready to become an annotation: drag finished and menu armed
    pub fn finalized_rect(&self) -> Option<Rect> {
        if self.dragging || self.menu.is_none() {
            return None;
        }
        self.rect
    }

    pub fn begin_selection(&mut self, point: Point) -> Result<(), SelectionError> {
        if !self.annotation_mode {
            return Err(SelectionError::AnnotationModeDisabled);
        }

        self.dragging = true;
        self.start = Some(point);
        self.end = Some(point);
        self.rect = None;
        self.menu = None;
        Ok(())
    }

    pub fn update_selection(&mut self, point: Point) -> Result<Rect, SelectionError> {
        let start = match (self.dragging, self.start) {
            (true, Some(start)) => start,
            _ => return Err(SelectionError::NotDragging),
        };

        let rect = Rect::from_points(start, point);
        self.end = Some(point);
        self.rect = Some(rect);
        Ok(rect)
    }

    /// Finish the drag. Returns the armed menu, or `None` when the drag
    /// covered no area and the selection was dropped.
    pub fn end_selection(&mut self, point: Point) -> Result<Option<CreationMenu>, SelectionError> {
        let rect = self.update_selection(point)?;
        self.dragging = false;

        if rect.is_degenerate() {
            tracing::debug!(x = rect.x, y = rect.y, "zero-area selection dropped");
            self.clear();
            return Ok(None);
        }

        let menu = CreationMenu::above(&rect);
        self.menu = Some(menu);
        Ok(Some(menu))
    }

    /// Close the creation menu without choosing a kind.
    pub fn dismiss_menu(&mut self) {
        self.clear();
    }

    pub fn clear(&mut self) {
        self.dragging = false;
        self.start = None;
        self.end = None;
        self.rect = None;
        self.menu = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> SelectionEngine {
        let mut engine = SelectionEngine::new();
        engine.set_annotation_mode(true);
        engine
    }

    #[test]
    fn begin_requires_annotation_mode() {
        let mut engine = SelectionEngine::new();
        assert_eq!(
            engine.begin_selection(Point::new(1.0, 1.0)),
            Err(SelectionError::AnnotationModeDisabled)
        );
        assert!(!engine.is_dragging());
    }

    #[test]
    fn update_and_end_require_a_drag() {
        let mut engine = engine();
        assert_eq!(
            engine.update_selection(Point::new(1.0, 1.0)),
            Err(SelectionError::NotDragging)
        );
        assert_eq!(
            engine.end_selection(Point::new(1.0, 1.0)),
            Err(SelectionError::NotDragging)
        );
    }

    #[test]
    fn drag_produces_normalized_rect_and_menu() {
        let mut engine = engine();
        engine.begin_selection(Point::new(40.0, 25.0)).unwrap();
        assert_eq!(engine.start(), engine.end());
        assert_eq!(engine.normalized_rect(), None);

        let live = engine.update_selection(Point::new(20.0, 60.0)).unwrap();
        assert_eq!(live, Rect::new(20.0, 25.0, 20.0, 35.0));
        assert_eq!(engine.finalized_rect(), None);

        let menu = engine.end_selection(Point::new(10.0, 20.0)).unwrap().unwrap();
        assert!(!engine.is_dragging());
        assert_eq!(engine.finalized_rect(), Some(Rect::new(10.0, 20.0, 30.0, 5.0)));
        assert_eq!(menu.anchor, Point::new(10.0, 0.0));
    }

    #[test]
    fn menu_anchor_sits_above_the_rect() {
        let mut engine = engine();
        engine.begin_selection(Point::new(15.0, 200.0)).unwrap();
        let menu = engine.end_selection(Point::new(75.0, 230.0)).unwrap().unwrap();
        assert_eq!(menu.anchor, Point::new(15.0, 200.0 - MENU_VERTICAL_OFFSET));
    }

    #[test]
    fn zero_area_drag_is_dropped() {
        let mut engine = engine();
        let point = Point::new(12.0, 34.0);
        engine.begin_selection(point).unwrap();

        assert_eq!(engine.end_selection(point).unwrap(), None);
        assert_eq!(engine.normalized_rect(), None);
        assert_eq!(engine.menu(), None);
        assert_eq!(engine.start(), None);
    }

    #[test]
    fn line_shaped_drag_still_arms_menu() {
        let mut engine = engine();
        engine.begin_selection(Point::new(5.0, 50.0)).unwrap();
        let menu = engine.end_selection(Point::new(95.0, 50.0)).unwrap();
        assert!(menu.is_some());
        assert_eq!(engine.finalized_rect().map(|r| r.height), Some(0.0));
    }

    #[test]
    fn new_drag_discards_previous_selection() {
        let mut engine = engine();
        engine.begin_selection(Point::new(0.0, 0.0)).unwrap();
        engine.end_selection(Point::new(10.0, 10.0)).unwrap();
        assert!(engine.menu().is_some());

        engine.begin_selection(Point::new(50.0, 50.0)).unwrap();
        assert!(engine.menu().is_none());
        assert!(engine.normalized_rect().is_none());
        assert!(engine.is_dragging());
    }

    #[test]
    fn dismiss_and_mode_off_clear_state() {
        let mut engine = engine();
        engine.begin_selection(Point::new(0.0, 0.0)).unwrap();
        engine.end_selection(Point::new(10.0, 10.0)).unwrap();
        engine.dismiss_menu();
        assert!(engine.finalized_rect().is_none());

        engine.begin_selection(Point::new(0.0, 0.0)).unwrap();
        engine.update_selection(Point::new(3.0, 3.0)).unwrap();
        engine.set_annotation_mode(false);
        assert!(!engine.is_dragging());
        assert!(engine.normalized_rect().is_none());
    }

    #[test]
    fn rect_extents_are_never_negative() {
        let points = [
            Point::new(-30.0, 12.5),
            Point::new(0.0, 0.0),
            Point::new(99.0, -4.0),
            Point::new(3.25, 3.25),
        ];

        for start in points {
            for end in points {
                let mut engine = engine();
                engine.begin_selection(start).unwrap();
                let rect = engine.update_selection(end).unwrap();
                assert!(rect.width >= 0.0 && rect.height >= 0.0);
                assert_eq!(rect.x, start.x.min(end.x));
                assert_eq!(rect.y, start.y.min(end.y));
                assert_eq!(rect.width, (end.x - start.x).abs());
                assert_eq!(rect.height, (end.y - start.y).abs());
            }
        }
    }
}
