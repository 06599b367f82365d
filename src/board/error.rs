//! Error types for chess board operations.

use std::fmt;

use super::{Color, Piece, Square};

/// Error type for square parsing and range validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Index outside 0-63
    OutOfRange { index: usize },
    /// Signed index that is negative or outside 0-63
    NegativeOrOutOfRange { index: i32 },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::OutOfRange { index } => {
                write!(f, "Square index {index} out of range (must be 0-63)")
            }
            SquareError::NegativeOrOutOfRange { index } => {
                write!(f, "Square index {index} out of range (must be 0-63)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// A broken structural invariant of a position.
///
/// These are programming errors, not rules errors: a session that hits one
/// is no longer trustworthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// No king of this color on the board
    MissingKing { color: Color },
    /// More than one king of this color
    MultipleKings { color: Color, count: u32 },
    /// Two piece bitboards claim the same square
    OverlappingBitboards { square: Square },
    /// Cached occupancy differs from the OR of the piece bitboards
    OccupancyMismatch { cached: u64, expected: u64 },
    /// Incremental hash differs from a full recomputation
    HashMismatch { incremental: u64, recomputed: u64 },
    /// The king of the side not on move is attacked and could be captured
    OpponentInCheck { color: Color },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::MissingKing { color } => {
                write!(f, "{color} king is missing from the board")
            }
            InvariantViolation::MultipleKings { color, count } => {
                write!(f, "{color} has {count} kings on the board")
            }
            InvariantViolation::OverlappingBitboards { square } => {
                write!(f, "Square {square} is claimed by more than one piece")
            }
            InvariantViolation::OccupancyMismatch { cached, expected } => {
                write!(
                    f,
                    "Occupancy mask {cached:#018x} does not match pieces {expected:#018x}"
                )
            }
            InvariantViolation::HashMismatch {
                incremental,
                recomputed,
            } => {
                write!(
                    f,
                    "Incremental hash {incremental:#018x} differs from recomputed {recomputed:#018x}"
                )
            }
            InvariantViolation::OpponentInCheck { color } => {
                write!(f, "{color} king is in check with {} to move", color.opponent())
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Error type for rejected promotion requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionError {
    /// No promotion is waiting to be resolved
    NotPending,
    /// A promotion is pending, but on another square
    WrongSquare { requested: Square, pending: Square },
    /// Pawns may only become a knight, bishop, rook or queen
    InvalidPiece { piece: Piece },
}

impl fmt::Display for PromotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionError::NotPending => write!(f, "No promotion is pending"),
            PromotionError::WrongSquare { requested, pending } => {
                write!(f, "Promotion is pending on {pending}, not {requested}")
            }
            PromotionError::InvalidPiece { piece } => {
                write!(f, "Cannot promote a pawn to {piece:?}")
            }
        }
    }
}

impl std::error::Error for PromotionError {}

/// Error type for rejected move requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// One of the squares is not a valid board index
    InvalidSquare(SquareError),
    /// There is no piece on the origin square
    EmptySquare { square: Square },
    /// The piece on the origin square belongs to the side not on move
    NotYourTurn { square: Square },
    /// The destination is not among the legal moves of the piece
    IllegalMove { from: Square, to: Square },
    /// A promotion must be resolved before any other move
    PromotionPending { square: Square },
    /// The promotion request was rejected
    Promotion(PromotionError),
    /// The game has already ended
    GameOver,
    /// A background search owns the next move
    SearchInProgress,
    /// The session hit an invariant violation and refuses further moves
    Corrupted(InvariantViolation),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidSquare(err) => write!(f, "{err}"),
            MoveError::EmptySquare { square } => write!(f, "No piece on {square}"),
            MoveError::NotYourTurn { square } => {
                write!(f, "The piece on {square} belongs to the side not on move")
            }
            MoveError::IllegalMove { from, to } => write!(f, "Illegal move {from}{to}"),
            MoveError::PromotionPending { square } => {
                write!(f, "Promotion on {square} must be resolved first")
            }
            MoveError::Promotion(err) => write!(f, "{err}"),
            MoveError::GameOver => write!(f, "The game is over"),
            MoveError::SearchInProgress => write!(f, "A search is in progress"),
            MoveError::Corrupted(err) => write!(f, "Game session is corrupted: {err}"),
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveError::InvalidSquare(err) => Some(err),
            MoveError::Promotion(err) => Some(err),
            MoveError::Corrupted(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SquareError> for MoveError {
    fn from(err: SquareError) -> Self {
        MoveError::InvalidSquare(err)
    }
}

impl From<PromotionError> for MoveError {
    fn from(err: PromotionError) -> Self {
        MoveError::Promotion(err)
    }
}

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    TooFewParts { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Placement does not describe exactly 8 ranks
    InvalidRankCount { ranks: usize },
    /// Too many files in a rank
    TooManyFiles { rank: usize, files: usize },
    /// Halfmove clock is not a number
    InvalidHalfmoveClock { found: String },
    /// The position parsed but breaks a structural invariant
    Invariant(InvariantViolation),
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidRankCount { ranks } => {
                write!(f, "FEN placement must have 8 ranks, found {ranks}")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::InvalidHalfmoveClock { found } => {
                write!(f, "Invalid halfmove clock '{found}'")
            }
            FenError::Invariant(err) => write!(f, "Invalid position: {err}"),
        }
    }
}

impl std::error::Error for FenError {}

impl From<InvariantViolation> for FenError {
    fn from(err: InvariantViolation) -> Self {
        FenError::Invariant(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_too_few_parts() {
        let err = FenError::TooFewParts { found: 2 };
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let err = FenError::InvalidPiece { char: 'z' };
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_square_error_out_of_range() {
        let err = SquareError::OutOfRange { index: 64 };
        assert!(err.to_string().contains("64"));
    }

    #[test]
    fn test_move_error_wraps_square_error() {
        use std::error::Error;

        let err = MoveError::from(SquareError::OutOfRange { index: 99 });
        assert!(err.to_string().contains("99"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invariant_violation_display() {
        let err = InvariantViolation::MissingKing {
            color: Color::Black,
        };
        assert_eq!(err.to_string(), "Black king is missing from the board");
    }

    #[test]
    fn test_opponent_in_check_display() {
        let err = InvariantViolation::OpponentInCheck {
            color: Color::Black,
        };
        assert_eq!(err.to_string(), "Black king is in check with White to move");
    }

    #[test]
    fn test_promotion_error_display() {
        let err = PromotionError::InvalidPiece { piece: Piece::King };
        assert!(err.to_string().contains("King"));
    }
}
