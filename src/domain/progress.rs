use log::info;

/// Track progress of a crawl pass, logging at coarse milestones
pub struct CrawlProgress {
    label: &'static str,
    total: usize,
    done: usize,
    every: usize,
}

impl CrawlProgress {
    pub fn new(label: &'static str, total: usize, every: usize) -> Self {
        Self {
            label,
            total,
            done: 0,
            every: every.max(1),
        }
    }

    pub fn advance(&mut self, count: usize) {
        let before = self.done;
        self.done += count;
        if crossed_milestone(before, self.done, self.every) && !is_complete(self.done, self.total) {
            info!("  → Completed {} of {} {}", self.done, self.total, self.label);
        }
    }

    pub fn current_count(&self) -> usize {
        self.done
    }

    pub fn finish(&self) {
        info!("  → Finished {} {}", self.done, self.label);
    }
}

fn crossed_milestone(before: usize, after: usize, every: usize) -> bool {
    after / every > before / every
}

fn is_complete(current: usize, total: usize) -> bool {
    current >= total
}
