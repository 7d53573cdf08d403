use crate::attacks::{DIAGONAL_DIRS, ORTHOGONAL_DIRS, king_attacks, knight_attacks};
use crate::{board::Position, types::*};

const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Generate all legal moves, returning a freshly allocated vector.
/// Internally delegates to `legal_moves_into`, cloning the position only once.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    let mut tmp = pos.clone();
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    out
}

/// Legal moves `side` would have if it were its turn in this position.
///
/// For the side to move this is `legal_moves`. For the other side the
/// en-passant square is dropped, since it only belongs to the mover, and
/// moves onto the mover's king are left out: a king is never captured.
pub fn legal_moves_for(pos: &Position, side: Color) -> Vec<Move> {
    if side == pos.side_to_move {
        return legal_moves(pos);
    }
    let mut tmp = pos.clone();
    tmp.side_to_move = side;
    tmp.en_passant = None;
    let mut out = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut out);
    if let Some(king) = pos.king_sq(pos.side_to_move) {
        out.retain(|mv| mv.to != king);
    }
    out
}

/// Moves that follow piece geometry for the side to move, before the
/// king-safety filter.
pub fn pseudo_legal_moves(pos: &Position) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    pseudo_moves(pos, &mut out);
    out
}

/// Generate all legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(pos: &mut Position, out: &mut Vec<Move>) {
    out.clear();
    pseudo_moves(pos, out);

    let mover = pos.side_to_move;
    // Filter illegal moves in-place by playing them on the mutable position.
    out.retain(|&mv| match pos.make_move(mv) {
        Ok(undo) => {
            let illegal = pos.in_check(mover);
            pos.unmake_move(mv, undo);
            !illegal
        }
        Err(_) => false,
    });
}

fn pseudo_moves(pos: &Position, out: &mut Vec<Move>) {
    for sq in 0..64u8 {
        let pc = match pos.piece_at(sq) {
            Some(p) => p,
            None => continue,
        };
        if pc.color != pos.side_to_move {
            continue;
        }
        match pc.kind {
            PieceKind::Pawn => gen_pawn(pos, sq, pc.color, out),
            PieceKind::Knight => gen_leaper(pos, sq, pc.color, out, knight_attacks(sq)),
            PieceKind::Bishop => gen_slider(pos, sq, pc.color, out, &DIAGONAL_DIRS),
            PieceKind::Rook => gen_slider(pos, sq, pc.color, out, &ORTHOGONAL_DIRS),
            PieceKind::Queen => {
                gen_slider(pos, sq, pc.color, out, &DIAGONAL_DIRS);
                gen_slider(pos, sq, pc.color, out, &ORTHOGONAL_DIRS);
            }
            PieceKind::King => {
                gen_leaper(pos, sq, pc.color, out, king_attacks(sq));
                gen_castle(pos, sq, pc.color, out);
            }
        }
    }
}

fn push_pawn_move(from: u8, to: u8, promo_rank: i8, out: &mut Vec<Move>) {
    if rank_of(to) == promo_rank {
        for pk in PROMOTIONS {
            let mut mv = Move::new(from, to);
            mv.promo = Some(pk);
            out.push(mv);
        }
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawn(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    let f = file_of(from);
    let r = rank_of(from);

    let (dir, start_rank, promo_rank): (i8, i8, i8) = match c {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };

    // forward 1, and 2 from the start rank
    if let Some(to) = sq(f, r + dir)
        && pos.piece_at(to).is_none()
    {
        push_pawn_move(from, to, promo_rank, out);
        if r == start_rank
            && let Some(to2) = sq(f, r + 2 * dir)
            && pos.piece_at(to2).is_none()
        {
            out.push(Move::new(from, to2));
        }
    }

    // captures + en-passant
    for df in [-1, 1] {
        let Some(to) = sq(f + df, r + dir) else {
            continue;
        };
        match pos.piece_at(to) {
            Some(tpc) if tpc.color != c => push_pawn_move(from, to, promo_rank, out),
            None if pos.en_passant == Some(to) => {
                let mut mv = Move::new(from, to);
                mv.is_en_passant = true;
                out.push(mv);
            }
            _ => {}
        }
    }
}

fn gen_leaper(
    pos: &Position,
    from: u8,
    c: Color,
    out: &mut Vec<Move>,
    targets: crate::bitboard::Bitboard,
) {
    for to in targets {
        match pos.piece_at(to) {
            Some(pc) if pc.color == c => {}
            _ => out.push(Move::new(from, to)),
        }
    }
}

fn gen_slider(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>, dirs: &[(i8, i8)]) {
    let f0 = file_of(from);
    let r0 = rank_of(from);
    for (df, dr) in dirs {
        let mut f = f0 + df;
        let mut r = r0 + dr;
        while let Some(to) = sq(f, r) {
            match pos.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(pc) if pc.color != c => {
                    out.push(Move::new(from, to));
                    break;
                }
                _ => break,
            }
            f += df;
            r += dr;
        }
    }
}

fn gen_castle(pos: &Position, from: u8, c: Color, out: &mut Vec<Move>) {
    // (king square, kingside right, queenside right)
    let (king_from, kingside, queenside) = match c {
        Color::White => (4u8, pos.castling.wk, pos.castling.wq),
        Color::Black => (60u8, pos.castling.bk, pos.castling.bq),
    };
    if from != king_from {
        return;
    }

    // Can't castle out of check.
    if pos.in_check(c) {
        return;
    }

    let enemy = c.other();
    let empty = |squares: &[u8]| squares.iter().all(|&s| pos.piece_at(s).is_none());
    let safe = |squares: &[u8]| squares.iter().all(|&s| !pos.is_square_attacked(s, enemy));

    // King side: f and g files empty and not attacked
    let (f_sq, g_sq) = (king_from + 1, king_from + 2);
    if kingside && empty(&[f_sq, g_sq]) && safe(&[f_sq, g_sq]) {
        let mut mv = Move::new(king_from, g_sq);
        mv.is_castle = true;
        out.push(mv);
    }
    // Queen side: b, c, d files empty; c and d not attacked
    let (d_sq, c_sq, b_sq) = (king_from - 1, king_from - 2, king_from - 3);
    if queenside && empty(&[d_sq, c_sq, b_sq]) && safe(&[d_sq, c_sq]) {
        let mut mv = Move::new(king_from, c_sq);
        mv.is_castle = true;
        out.push(mv);
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
