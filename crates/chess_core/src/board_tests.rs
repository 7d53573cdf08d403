use super::*;
use crate::movegen::legal_moves;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap()
}

#[test]
fn test_fen_round_trip() {
    for s in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        KIWIPETE,
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        "8/8/8/4k3/8/4K3/8/8 w - - 100 60",
    ] {
        assert_eq!(fen(s).to_fen(), s);
    }
    assert_eq!(Position::startpos(), fen(&Position::startpos().to_fen()));
}

#[test]
fn test_from_fen_rejects_malformed_input() {
    assert!(matches!(
        Position::from_fen("8/8/8 w - -"),
        Err(RulesError::InvalidFen { .. })
    ));
    assert!(Position::from_fen("8/8/8/8/8/8/8/9 w - - 0 1").is_err());
    assert!(Position::from_fen("8/8/8/8/8/8/8/7x w - - 0 1").is_err());
    assert!(Position::from_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
    assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - z9 0 1").is_err());
    assert!(Position::from_fen("8/8/8/8/8/8/8/8 w - - many 1").is_err());
}

#[test]
fn test_make_unmake_restores_every_move() {
    let original = fen(KIWIPETE);
    let mut pos = original.clone();
    for mv in legal_moves(&original) {
        let undo = pos.make_move(mv).unwrap();
        assert_ne!(pos, original);
        pos.unmake_move(mv, undo);
        assert_eq!(pos, original, "unmake of {mv} did not restore the position");
    }
}

#[test]
fn test_make_move_from_empty_square_fails() {
    let mut pos = Position::startpos();
    let err = pos.make_move(Move::new(20, 28)).unwrap_err();
    assert!(matches!(err, RulesError::IllegalMove { .. }));
    assert_eq!(pos, Position::startpos());
}

#[test]
fn test_attacks_from() {
    let pos = Position::startpos();
    // Knight on b1 attacks a3, c3 and its own d2 pawn
    let knight = pos.attacks_from(1);
    assert_eq!(knight.popcount(), 3);
    assert!(knight.contains(16) && knight.contains(18) && knight.contains(11));
    // Rook on a1 is boxed in: sees a2 and b1 only
    let rook = pos.attacks_from(0);
    assert_eq!(rook.popcount(), 2);
    // White pawn on e2 attacks d3 and f3
    let pawn = pos.attacks_from(12);
    assert!(pawn.contains(19) && pawn.contains(21));
    // Empty square attacks nothing
    assert!(pos.attacks_from(27).is_empty());
}

#[test]
fn test_is_pinned() {
    // White knight d2 pinned by the bishop on b4 against Ke1
    let pos = fen("4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1");
    assert!(pos.is_pinned(Color::White, 11));
    // A rook cannot pin along a diagonal
    let pos = fen("4k3/8/8/8/1r6/8/3N4/4K3 w - - 0 1");
    assert!(!pos.is_pinned(Color::White, 11));
    // Two pieces between king and slider: neither is pinned
    let pos = fen("4k3/4r3/8/8/4P3/8/4N3/4K3 w - - 0 1");
    assert!(!pos.is_pinned(Color::White, 12));
    assert!(!pos.is_pinned(Color::White, 28));
    // Pawn pinned on the file by a queen
    let pos = fen("4k3/4q3/8/8/8/8/4P3/4K3 w - - 0 1");
    assert!(pos.is_pinned(Color::White, 12));
    // No king, nothing pinned
    let pos = fen("8/8/8/8/1b6/8/3N4/8 w - - 0 1");
    assert!(!pos.is_pinned(Color::White, 11));
}

#[test]
fn test_piece_queries() {
    let pos = Position::startpos();
    assert_eq!(pos.piece_count(Color::White, PieceKind::Pawn), 8);
    assert_eq!(pos.piece_count(Color::Black, PieceKind::Knight), 2);
    assert_eq!(pos.occupied().popcount(), 32);
    assert_eq!(pos.king_sq(Color::White), Some(4));
    assert_eq!(pos.king_sq(Color::Black), Some(60));
}

#[test]
fn test_castling_round_trip_restores_rook() {
    let original = fen(KIWIPETE);
    let mut pos = original.clone();
    let mut castle = Move::new(4, 6);
    castle.is_castle = true;
    let undo = pos.make_move(castle).unwrap();
    assert_eq!(pos.piece_at(5).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(pos.piece_at(7).is_none());
    assert!(!pos.castling.wk && !pos.castling.wq);
    pos.unmake_move(castle, undo);
    assert_eq!(pos, original);
}

#[test]
fn test_castling_needs_an_own_rook() {
    // Castling right claimed, but a knight stands on h1
    let original = fen("4k3/8/8/8/8/8/8/4K2N w K - 0 1");
    let mut pos = original.clone();
    let mut castle = Move::new(4, 6);
    castle.is_castle = true;
    assert!(matches!(
        pos.make_move(castle),
        Err(RulesError::IllegalMove { .. })
    ));
    assert_eq!(pos, original);
    assert!(legal_moves(&pos).iter().all(|m| !m.is_castle));

    // An enemy rook on h1 does not count either
    let mut enemy = fen("4k3/8/8/8/8/8/8/4K2r w K - 0 1");
    assert!(enemy.make_move(castle).is_err());
}
