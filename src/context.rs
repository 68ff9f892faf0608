//! Dialogue session: the live cursor over a [`Dialogue`].
//!
//! A [`DialogueContext`] owns the visit history and the currently active
//! node. Entering a node records it, fires its enter events, binds its text
//! and re-evaluates its children into two listings:
//!
//! - `options()`: satisfied edges only, what a player can pick
//! - `all_options()`: every valid edge, unsatisfied ones included unless
//!   they opted out with `include_when_unsatisfied = false`
//!
//! Selector nodes pass straight through to their first satisfied child, and
//! End nodes close the session.

use std::sync::Arc;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dispatch::dispatch;
use crate::eval::{construct_text, evaluate_edge, MissingArgumentPolicy, Traversal, VisitedSet};
use crate::model::{Dialogue, Edge, Node, NodeId, NodeKind, TextArgument};
use crate::participant::{ParticipantHandle, Participants};
use crate::{Error, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// What unresolvable text arguments turn into.
    pub missing_argument: MissingArgumentPolicy,
    /// Longest chain of selector pass-throughs one call may follow. Going
    /// past it ends the session with `Error::TooManyTransitions`.
    pub max_auto_transitions: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            missing_argument: MissingArgumentPolicy::default(),
            max_auto_transitions: 64,
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// One listed child edge of the active node, with its text bound.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeOption {
    /// Copy of the authored edge with `constructed_text` filled in.
    pub edge: Edge,
    pub satisfied: bool,
}

impl EdgeOption {
    pub fn text(&self) -> &str {
        self.edge.display_text()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.edge.target
    }

    pub fn speaker_state(&self) -> &str {
        &self.edge.speaker_state
    }
}

// ============================================================================
// Context
// ============================================================================

/// A running conversation.
#[derive(Debug)]
pub struct DialogueContext {
    dialogue: Arc<Dialogue>,
    participants: Participants,
    config: ContextConfig,
    history: HashSet<NodeId>,
    active: NodeId,
    active_text: String,
    options: Vec<EdgeOption>,
    all_options: Vec<EdgeOption>,
    ended: bool,
}

impl DialogueContext {
    /// Start a session at the dialogue's start node.
    pub fn start(dialogue: impl Into<Arc<Dialogue>>, participants: Participants, config: ContextConfig) -> Result<Self> {
        let dialogue = dialogue.into();
        let start = dialogue.start;
        if dialogue.node(start).is_none() {
            return Err(Error::NodeNotFound(start));
        }
        info!(dialogue = %dialogue.name, node = %start, "starting dialogue");

        let mut context = Self {
            dialogue,
            participants,
            config,
            history: HashSet::new(),
            active: start,
            active_text: String::new(),
            options: Vec::new(),
            all_options: Vec::new(),
            ended: false,
        };
        context.enter(start)?;
        Ok(context)
    }

    /// Jump to `id` regardless of edges.
    pub fn enter_node(&mut self, id: NodeId) -> Result<()> {
        if self.ended {
            return Err(Error::DialogueEnded);
        }
        self.enter(id)
    }

    /// Take the `index`-th satisfied option.
    pub fn choose_option(&mut self, index: usize) -> Result<()> {
        if self.ended {
            return Err(Error::DialogueEnded);
        }
        let target = self
            .options
            .get(index)
            .and_then(EdgeOption::target)
            .ok_or(Error::NoSuchOption { index, available: self.options.len() })?;
        self.enter(target)
    }

    /// Take the `index`-th entry of the all-options listing. Entries that
    /// are listed but unsatisfied are refused.
    pub fn choose_from_all(&mut self, index: usize) -> Result<()> {
        if self.ended {
            return Err(Error::DialogueEnded);
        }
        let option = self
            .all_options
            .get(index)
            .ok_or(Error::NoSuchOption { index, available: self.all_options.len() })?;
        if !option.satisfied {
            return Err(Error::OptionUnsatisfied(index));
        }
        let target = option.target().ok_or(Error::NoSuchOption { index, available: self.all_options.len() })?;
        self.enter(target)
    }

    /// Recompute the active text and both option listings from current
    /// participant state. Call after changing participants from outside.
    pub fn reevaluate_options(&mut self) {
        let dialogue = Arc::clone(&self.dialogue);
        let Some(node) = dialogue.node(self.active) else {
            self.active_text.clear();
            self.options.clear();
            self.all_options.clear();
            return;
        };

        self.active_text = self.bind(&node.text, node, &node.text_arguments);

        let visited = VisitedSet::seeded(self.active);
        let mut options = Vec::new();
        let mut all_options = Vec::new();
        for edge in node.children.iter().filter(|e| e.is_valid()) {
            let satisfied = evaluate_edge(edge, &*self, &visited);
            if !satisfied && !edge.include_when_unsatisfied {
                continue;
            }
            let mut edge = edge.clone();
            edge.constructed_text = self.bind(&edge.text, node, &edge.text_arguments);
            let option = EdgeOption { edge, satisfied };
            if satisfied {
                options.push(option.clone());
            }
            all_options.push(option);
        }
        debug!(node = %self.active, satisfied = options.len(), listed = all_options.len(), "options evaluated");

        self.options = options;
        self.all_options = all_options;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn active_node(&self) -> NodeId {
        self.active
    }

    pub fn active_node_data(&self) -> Option<&Node> {
        self.dialogue.node(self.active)
    }

    /// Speaker of the active node.
    pub fn active_speaker(&self) -> &str {
        self.active_node_data().map_or("", |n| n.speaker.as_str())
    }

    pub fn active_text(&self) -> &str {
        &self.active_text
    }

    pub fn options(&self) -> &[EdgeOption] {
        &self.options
    }

    pub fn all_options(&self) -> &[EdgeOption] {
        &self.all_options
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn was_node_visited(&self, id: NodeId) -> bool {
        self.history.contains(&id)
    }

    /// Every node entered so far, in no particular order.
    pub fn visited_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.history.iter().copied()
    }

    pub fn participant(&self, name: &str) -> Option<&ParticipantHandle> {
        self.participants.get(name)
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    pub fn dialogue(&self) -> &Dialogue {
        &self.dialogue
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Enter `id`, then follow selector pass-throughs.
    fn enter(&mut self, id: NodeId) -> Result<()> {
        let dialogue = Arc::clone(&self.dialogue);
        let mut next = id;
        let mut hops = 0usize;

        loop {
            let node = dialogue.node(next).ok_or(Error::NodeNotFound(next))?;
            info!(node = %next, speaker = %node.speaker, "entering node");

            self.active = next;
            self.history.insert(next);
            for event in &node.enter_events {
                if let Err(e) = dispatch(event, &self.participants) {
                    warn!(node = %next, participant = %event.participant, error = %e, "enter event dropped");
                }
            }
            self.reevaluate_options();

            match node.kind {
                NodeKind::Speech => return Ok(()),
                NodeKind::End => {
                    info!(node = %next, "dialogue ended");
                    self.ended = true;
                    return Ok(());
                }
                NodeKind::Selector => {
                    let Some(target) = self.options.first().and_then(EdgeOption::target) else {
                        warn!(node = %next, "selector has no satisfied child, ending dialogue");
                        self.ended = true;
                        return Ok(());
                    };
                    hops += 1;
                    if hops > self.config.max_auto_transitions {
                        warn!(node = %next, max = self.config.max_auto_transitions, "selector chain too long, ending dialogue");
                        self.ended = true;
                        return Err(Error::TooManyTransitions(self.config.max_auto_transitions));
                    }
                    next = target;
                }
            }
        }
    }

    fn bind(&self, template: &str, owner: &Node, arguments: &[TextArgument]) -> String {
        construct_text(template, arguments, self, &owner.speaker, self.config.missing_argument)
    }
}

impl Traversal for DialogueContext {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.dialogue.node(id)
    }

    fn participant(&self, name: &str) -> Option<&ParticipantHandle> {
        self.participants.get(name)
    }

    fn was_node_visited(&self, id: NodeId) -> bool {
        self.history.contains(&id)
    }
}
