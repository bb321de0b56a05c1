//! The page flow: vertical cursor, active page, page count.
//!
//! Every block routine goes through a [`PageFlow`]. It is the only thing that
//! opens and finalizes pages, so the rules live in one place:
//!
//! - at most one page is active at a time;
//! - a page is finalized exactly once, before the next one opens;
//! - the cursor resets to the top margin on every new page;
//! - the cursor never moves up within a page.
//!
//! If a flow is dropped with a page still open (an error unwound past it),
//! the page is finalized on drop so the sink never loses a page.

use crate::error::Result;
use crate::model::PageGeometry;

use super::PageSink;

pub struct PageFlow<'s, S: PageSink> {
    sink: &'s mut S,
    geometry: PageGeometry,
    active: Option<S::Page>,
    cursor_y: f64,
    page_count: usize,
}

impl<'s, S: PageSink> PageFlow<'s, S> {
    /// A flow with no page open yet.
    pub fn new(sink: &'s mut S, geometry: PageGeometry) -> Self {
        Self {
            sink,
            geometry,
            active: None,
            cursor_y: geometry.margin,
            page_count: 0,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Distance from the top edge of the page to the cursor.
    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    /// Pages opened so far, including the active one.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn has_active_page(&self) -> bool {
        self.active.is_some()
    }

    /// Space left between the cursor and the bottom margin.
    pub fn remaining_height(&self) -> f64 {
        (self.geometry.bottom_limit() - self.cursor_y).max(0.0)
    }

    /// Finalize the active page, if any, and open a new one.
    pub fn start_page(&mut self) -> Result<()> {
        self.finalize_active()?;
        self.open_page();
        Ok(())
    }

    /// Start a new page if `height` does not fit below the cursor.
    /// Returns whether a page was started.
    pub fn ensure_space(&mut self, height: f64) -> Result<bool> {
        if self.cursor_y + height > self.geometry.bottom_limit() {
            self.start_page()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Move the cursor down. Negative amounts are ignored.
    pub fn advance(&mut self, height: f64) {
        self.cursor_y += height.max(0.0);
    }

    /// The page to draw on. Opens one if none is active.
    pub fn surface(&mut self) -> Result<&mut S::Page> {
        let page = match self.active.take() {
            Some(page) => page,
            None => self.new_page(),
        };
        Ok(self.active.insert(page))
    }

    /// Finalize the active page. Safe to call more than once.
    pub fn finish(&mut self) -> Result<()> {
        self.finalize_active()
    }

    fn open_page(&mut self) {
        let page = self.new_page();
        self.active = Some(page);
    }

    fn new_page(&mut self) -> S::Page {
        self.page_count += 1;
        self.cursor_y = self.geometry.margin;
        log::debug!("starting page {}", self.page_count);
        self.sink.new_page(
            self.geometry.effective_width,
            self.geometry.effective_height,
            self.page_count,
        )
    }

    fn finalize_active(&mut self) -> Result<()> {
        match self.active.take() {
            Some(page) => self.sink.finalize_page(page),
            None => Ok(()),
        }
    }
}

impl<S: PageSink> Drop for PageFlow<'_, S> {
    fn drop(&mut self) {
        if let Some(page) = self.active.take() {
            log::warn!("page {} was still open when layout stopped; finalizing it", self.page_count);
            if let Err(e) = self.sink.finalize_page(page) {
                log::warn!("finalizing page {} failed: {e}", self.page_count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::layout::{LayoutPage, PageCollector};
    use crate::model::PageSpec;

    fn a4() -> PageGeometry {
        PageSpec::default().geometry()
    }

    /// Records the order of sink calls.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl PageSink for Recorder {
        type Page = LayoutPage;

        fn new_page(&mut self, width: f64, height: f64, index: usize) -> LayoutPage {
            self.events.push(format!("new {index}"));
            LayoutPage::new(width, height, index)
        }

        fn finalize_page(&mut self, page: LayoutPage) -> Result<()> {
            self.events.push(format!("finalize {}", page.index));
            Ok(())
        }
    }

    #[test]
    fn start_page_finalizes_previous_first() {
        let mut sink = Recorder::default();
        {
            let mut flow = PageFlow::new(&mut sink, a4());
            flow.start_page().unwrap();
            flow.start_page().unwrap();
            flow.finish().unwrap();
        }
        assert_eq!(sink.events, vec!["new 1", "finalize 1", "new 2", "finalize 2"]);
    }

    #[test]
    fn cursor_resets_on_new_page() {
        let mut sink = PageCollector::new();
        let mut flow = PageFlow::new(&mut sink, a4());
        flow.start_page().unwrap();
        flow.advance(300.0);
        assert_eq!(flow.cursor_y(), 354.0);
        flow.start_page().unwrap();
        assert_eq!(flow.cursor_y(), 54.0);
        flow.finish().unwrap();
    }

    #[test]
    fn ensure_space_boundary_is_inclusive() {
        let mut sink = PageCollector::new();
        let mut flow = PageFlow::new(&mut sink, a4());
        flow.start_page().unwrap();
        // Exactly reaching the bottom limit still fits.
        assert!(!flow.ensure_space(734.0).unwrap());
        assert!(flow.ensure_space(734.5).unwrap());
        assert_eq!(flow.page_count(), 2);
        flow.finish().unwrap();
    }

    #[test]
    fn cursor_never_moves_up() {
        let mut sink = PageCollector::new();
        let mut flow = PageFlow::new(&mut sink, a4());
        flow.start_page().unwrap();
        flow.advance(-20.0);
        assert_eq!(flow.cursor_y(), 54.0);
        flow.finish().unwrap();
    }

    #[test]
    fn finish_is_idempotent() {
        let mut sink = PageCollector::new();
        {
            let mut flow = PageFlow::new(&mut sink, a4());
            flow.start_page().unwrap();
            flow.finish().unwrap();
            flow.finish().unwrap();
            assert!(!flow.has_active_page());
        }
        assert_eq!(sink.into_pages().len(), 1);
    }

    fn fail_with_open_page(sink: &mut PageCollector) -> Result<()> {
        let mut flow = PageFlow::new(sink, a4());
        flow.start_page()?;
        Err(RenderError::Input("stop".into()))
    }

    #[test]
    fn drop_finalizes_open_page() {
        let mut sink = PageCollector::new();
        assert!(fail_with_open_page(&mut sink).is_err());
        assert_eq!(sink.into_pages().len(), 1);
    }

    #[test]
    fn surface_opens_page_lazily() {
        let mut sink = PageCollector::new();
        {
            let mut flow = PageFlow::new(&mut sink, a4());
            assert!(!flow.has_active_page());
            flow.surface().unwrap();
            assert_eq!(flow.page_count(), 1);
            flow.finish().unwrap();
        }
        assert_eq!(sink.into_pages()[0].index, 1);
    }
}
