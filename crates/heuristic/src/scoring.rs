//! Rank-to-chance scoring.
//!
//! Maps a candidate's rank against a program's last opening and closing
//! ranks to a percentage:
//!
//! | rank                                  | chance                |
//! |---------------------------------------|-----------------------|
//! | at or better than opening rank        | 99                    |
//! | between opening and closing rank      | 95 down to 60         |
//! | up to 10% past the closing rank       | 60 down to 5          |
//! | further                               | 0                     |

use data_loader::Rank;

pub const CERTAIN: f32 = 99.0;
const BAND_TOP: f32 = 95.0;
const BAND_BOTTOM: f32 = 60.0;
const STRETCH_BOTTOM: f32 = 5.0;

/// Fraction of the closing rank still considered within reach
const STRETCH_MARGIN: f32 = 0.10;

/// Admission chance in percent, rounded to one decimal
pub fn admission_chance(rank: Rank, opening_rank: Rank, closing_rank: Rank) -> f32 {
    let chance = if rank <= opening_rank {
        CERTAIN
    } else if rank <= closing_rank {
        let width = (closing_rank - opening_rank) as f32;
        let depth = (rank - opening_rank) as f32 / width;
        BAND_TOP - (BAND_TOP - BAND_BOTTOM) * depth
    } else {
        let margin = (closing_rank as f32 * STRETCH_MARGIN).max(1.0);
        let over = (rank - closing_rank) as f32;
        if over <= margin {
            BAND_BOTTOM - (BAND_BOTTOM - STRETCH_BOTTOM) * (over / margin)
        } else {
            0.0
        }
    };

    (chance * 10.0).round() / 10.0
}
