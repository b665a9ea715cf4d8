//! Relationship-driven dialogue.
//!
//! Resolution walks a character's [`DialogueTree`] in authored order and
//! returns the first node whose [`Condition`] holds:
//!
//! 1. **Count**: the character's interaction counter goes up by one
//! 2. **Match**: nodes are tested in list order; the first true one wins
//! 3. **Fallback**: with no match, the greeting plus a lone "goodbye" is used
//! 4. **Respond**: the picked response's [`Effect`]s run in order, each
//!    relationship change clamping the score and re-deriving the mood

mod condition;
mod effect;
mod tree;

pub use condition::*;
pub use effect::*;
pub use tree::*;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wanderer_rules::{Archetype, Character, EntityId, Mood, WorldState};

use crate::notice::Notice;
use crate::random::RandomPort;

/// Which node a resolution landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeSource {
    /// Index into the character's tree.
    Authored(usize),
    Fallback,
}

/// What the dialogue UI shows after a resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDialogue {
    pub character: EntityId,
    pub name: String,
    pub archetype: Archetype,
    pub text: String,
    /// Response labels; key `1` picks index 0.
    pub responses: Vec<String>,
    pub mood: Mood,
    /// Colour of the mood indicator above the character.
    pub mood_color: u32,
    pub relationship: i32,
    pub source: NodeSource,
}

/// Result of the player picking a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseOutcome {
    Applied {
        response: String,
        notices: Vec<Notice>,
        relationship: i32,
        mood: Mood,
    },
    /// Nothing was pending, the node had no responses or the index was out of
    /// range. The conversation simply closes.
    Dismissed,
}

/// Owns one character's disposition and conversation state.
#[derive(Debug, Clone)]
pub struct RelationshipEngine {
    character: Character,
    tree: DialogueTree,
    /// Node shown by the last `resolve`, waiting for the player's answer.
    pending: Option<DialogueNode>,
}

impl RelationshipEngine {
    /// Engine with the archetype's authored tree.
    pub fn new(character: Character) -> Self {
        let tree = DialogueTree::for_archetype(character.archetype);
        Self::with_tree(character, tree)
    }

    pub fn with_tree(character: Character, tree: DialogueTree) -> Self {
        Self {
            character,
            tree,
            pending: None,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn tree(&self) -> &DialogueTree {
        &self.tree
    }

    /// The node awaiting a response, if a conversation is open.
    pub fn pending(&self) -> Option<&DialogueNode> {
        self.pending.as_ref()
    }

    /// Replace the mood without a relationship change (idle drift).
    pub fn drift_mood(&mut self, mood: Mood) {
        self.character.drift_mood(mood);
    }

    /// Start a conversation and pick the node to show.
    pub fn resolve(&mut self, world: &WorldState) -> ResolvedDialogue {
        self.character.record_interaction();

        let (node, source) = match self.tree.first_match(&self.character, world) {
            Some((index, node)) => (node.clone(), NodeSource::Authored(index)),
            None => (
                DialogueNode::fallback(self.character.greeting.clone()),
                NodeSource::Fallback,
            ),
        };

        debug!(
            character = %self.character.name,
            interactions = self.character.interaction_count(),
            ?source,
            "dialogue resolved"
        );

        let resolved = ResolvedDialogue {
            character: self.character.id,
            name: self.character.name.clone(),
            archetype: self.character.archetype,
            text: node.text.clone(),
            responses: node.responses.iter().map(|r| r.text.clone()).collect(),
            mood: self.character.mood(),
            mood_color: self.character.mood().indicator_color(),
            relationship: self.character.relationship(),
            source,
        };
        self.pending = Some(node);
        resolved
    }

    /// Apply the response at `index` of the pending node and close the conversation.
    pub fn apply_response(
        &mut self,
        index: usize,
        world: &mut WorldState,
        random: &mut dyn RandomPort,
    ) -> ResponseOutcome {
        let Some(node) = self.pending.take() else {
            return ResponseOutcome::Dismissed;
        };
        let Some(response) = node.responses.get(index) else {
            debug!(
                character = %self.character.name,
                index,
                available = node.responses.len(),
                "response out of range, closing conversation"
            );
            return ResponseOutcome::Dismissed;
        };

        let notices = response
            .effects
            .iter()
            .filter_map(|effect| effect.apply(&mut self.character, world, random))
            .collect();

        ResponseOutcome::Applied {
            response: response.text.clone(),
            notices,
            relationship: self.character.relationship(),
            mood: self.character.mood(),
        }
    }
}

/// Map a number key ('1'..='9') to a response index.
pub fn response_index_for_key(key: char) -> Option<usize> {
    key.to_digit(10)
        .filter(|digit| *digit >= 1)
        .map(|digit| digit as usize - 1)
}
