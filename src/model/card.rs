use serde::{Deserialize, Serialize};

/// Label shown on a card that is face down.
pub const CARD_BACK: &str = "?";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    #[default]
    FaceDown,
    FaceUp,
    Matched,
}

/// A card on the board. Its identity is its index in the deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub symbol: String,
    face: CardFace,
}

impl Card {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            face: CardFace::FaceDown,
        }
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn is_revealed(&self) -> bool {
        self.face == CardFace::FaceUp
    }

    pub fn is_matched(&self) -> bool {
        self.face == CardFace::Matched
    }

    /// Face down → face up. Matched cards stay matched.
    pub fn reveal(&mut self) {
        if self.face == CardFace::FaceDown {
            self.face = CardFace::FaceUp;
        }
    }

    /// Face up → face down, used when a pair fails. Matched cards never flip back.
    pub fn hide(&mut self) {
        if self.face == CardFace::FaceUp {
            self.face = CardFace::FaceDown;
        }
    }

    pub fn mark_matched(&mut self) {
        if self.face == CardFace::FaceUp {
            self.face = CardFace::Matched;
        }
    }

    pub fn view(&self) -> CardView {
        let label = match self.face {
            CardFace::FaceDown => CARD_BACK.to_string(),
            CardFace::FaceUp | CardFace::Matched => self.symbol.clone(),
        };
        CardView {
            face: self.face,
            label,
        }
    }
}

/// What the presentation layer needs to draw a card; the symbol of a face-down
/// card is never exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub face: CardFace,
    pub label: String,
}
