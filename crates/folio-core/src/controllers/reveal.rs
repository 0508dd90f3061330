//! Scroll-triggered reveal animations.

use std::collections::HashSet;

use tracing::debug;

use crate::config::RevealConfig;
use crate::context::RevealGroup;
use crate::page::{NodeId, Page};

/// Tracks which elements have been animated in.
///
/// The revealed set only grows. A pass never touches an element twice and
/// nothing here hides an element again.
#[derive(Debug, Clone)]
pub struct Reveal {
    groups: Vec<RevealGroup>,
    config: RevealConfig,
    revealed: HashSet<NodeId>,
}

impl Reveal {
    pub fn new(groups: Vec<RevealGroup>, config: RevealConfig) -> Self {
        Self {
            groups,
            config,
            revealed: HashSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.nodes.is_empty())
    }

    pub fn is_revealed(&self, node: NodeId) -> bool {
        self.revealed.contains(&node)
    }

    /// Every member with its stagger delay.
    fn members(&self) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.groups.iter().flat_map(|group| {
            group
                .nodes
                .iter()
                .enumerate()
                .map(move |(index, node)| (*node, group.stagger.delay_ms(index)))
        })
    }

    /// Give every unrevealed element its hidden starting style.
    pub fn prepare<P: Page>(&self, page: &mut P) {
        let duration = f64::from(self.config.duration_ms) / 1000.0;
        for (node, delay_ms) in self.members() {
            if self.is_revealed(node) {
                continue;
            }
            let transition = if delay_ms == 0 {
                format!("opacity {duration}s ease, transform {duration}s ease")
            } else {
                let delay = f64::from(delay_ms) / 1000.0;
                format!("opacity {duration}s ease {delay}s, transform {duration}s ease {delay}s")
            };
            page.set_style(node, "opacity", "0");
            page.set_style(
                node,
                "transform",
                &format!("translateY({}px)", self.config.offset),
            );
            page.set_style(node, "transition", &transition);
        }
    }

    /// Reveal every displayed element that has entered the viewport.
    /// Returns how many were revealed by this pass.
    pub fn reveal_visible<P: Page>(&mut self, page: &mut P) -> usize {
        let threshold = page.viewport_height() - self.config.margin;
        let due: Vec<NodeId> = self
            .members()
            .map(|(node, _)| node)
            .filter(|node| !self.revealed.contains(node))
            .filter(|node| page.is_displayed(*node) && page.viewport_top(*node) < threshold)
            .collect();

        for node in &due {
            page.set_style(*node, "opacity", "1");
            page.set_style(*node, "transform", "translateY(0)");
            page.add_class(*node, &self.config.visible_class);
            self.revealed.insert(*node);
        }

        if !due.is_empty() {
            debug!(count = due.len(), total = self.revealed.len(), "Revealed elements");
        }
        due.len()
    }
}
