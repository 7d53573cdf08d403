use crate::{board::Position, error::RulesResult, movegen::legal_moves_into, types::Move};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(pos: &mut Position, depth: u8) -> RulesResult<u64> {
    fn inner(pos: &mut Position, layers: &mut [Vec<Move>]) -> RulesResult<u64> {
        let Some((buf, rest)) = layers.split_first_mut() else {
            return Ok(1);
        };

        legal_moves_into(pos, buf);
        if rest.is_empty() {
            return Ok(buf.len() as u64);
        }

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            let undo = pos.make_move(mv)?;
            let sub = inner(pos, rest);
            pos.unmake_move(mv, undo);
            nodes += sub?;
        }
        Ok(nodes)
    }

    // One move buffer per remaining ply
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(pos, &mut layers[..])
}

/// Per-root-move node counts, for tracking down generator bugs.
pub fn perft_divide(pos: &mut Position, depth: u8) -> RulesResult<Vec<(Move, u64)>> {
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(pos, &mut moves);
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        let undo = pos.make_move(mv)?;
        let nodes = perft(pos, depth.saturating_sub(1));
        pos.unmake_move(mv, undo);
        out.push((mv, nodes?));
    }
    Ok(out)
}
