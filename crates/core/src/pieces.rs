//! Pieces module - tetromino catalog
//!
//! Every piece kind has a square bounding box (`dimension` 2, 3 or 4) and four
//! rotation masks over it. Masks are stored one byte per row, most significant
//! used bit = leftmost column, so `0b100` in a 3-wide piece is column 0.
//!
//! Insets (empty rows/columns around the occupied footprint) and the mino
//! offsets of every rotation are derived from the masks at compile time.

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to the top-left of the bounding box
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the bounding box origin
pub type PieceShape = [MinoOffset; 4];

/// One rotation state: a row bitmask per bounding-box row
pub type RotationMask = [u8; 4];

/// Empty border around a rotation's occupied cells.
///
/// The occupied footprint spans columns `left..dimension - right` and rows
/// `top..dimension - bottom` of the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Insets {
    pub left: i8,
    pub right: i8,
    pub top: i8,
    pub bottom: i8,
}

struct PieceDef {
    dimension: i8,
    masks: [RotationMask; 4],
}

/// Catalog, indexed by `PieceKind::index()` (I, J, L, O, S, T, Z)
const CATALOG: [PieceDef; 7] = [
    // I
    PieceDef {
        dimension: 4,
        masks: [
            [0b0000, 0b1111, 0b0000, 0b0000],
            [0b0010, 0b0010, 0b0010, 0b0010],
            [0b0000, 0b0000, 0b1111, 0b0000],
            [0b0100, 0b0100, 0b0100, 0b0100],
        ],
    },
    // J
    PieceDef {
        dimension: 3,
        masks: [
            [0b100, 0b111, 0b000, 0],
            [0b011, 0b010, 0b010, 0],
            [0b000, 0b111, 0b001, 0],
            [0b010, 0b010, 0b110, 0],
        ],
    },
    // L
    PieceDef {
        dimension: 3,
        masks: [
            [0b001, 0b111, 0b000, 0],
            [0b010, 0b010, 0b011, 0],
            [0b000, 0b111, 0b100, 0],
            [0b110, 0b010, 0b010, 0],
        ],
    },
    // O
    PieceDef {
        dimension: 2,
        masks: [
            [0b11, 0b11, 0, 0],
            [0b11, 0b11, 0, 0],
            [0b11, 0b11, 0, 0],
            [0b11, 0b11, 0, 0],
        ],
    },
    // S
    PieceDef {
        dimension: 3,
        masks: [
            [0b011, 0b110, 0b000, 0],
            [0b010, 0b011, 0b001, 0],
            [0b000, 0b011, 0b110, 0],
            [0b100, 0b110, 0b010, 0],
        ],
    },
    // T
    PieceDef {
        dimension: 3,
        masks: [
            [0b010, 0b111, 0b000, 0],
            [0b010, 0b011, 0b010, 0],
            [0b000, 0b111, 0b010, 0],
            [0b010, 0b110, 0b010, 0],
        ],
    },
    // Z
    PieceDef {
        dimension: 3,
        masks: [
            [0b110, 0b011, 0b000, 0],
            [0b001, 0b011, 0b010, 0],
            [0b000, 0b110, 0b011, 0],
            [0b010, 0b110, 0b100, 0],
        ],
    },
];

const fn mask_bit(mask: &RotationMask, dimension: i8, x: i8, y: i8) -> bool {
    if x < 0 || y < 0 || x >= dimension || y >= dimension {
        return false;
    }
    (mask[y as usize] >> (dimension - 1 - x)) & 1 == 1
}

/// Scan a mask inward from each edge to the first occupied cell.
///
/// Returns `None` when the mask has no occupied cell at all.
pub const fn scan_insets(mask: &RotationMask, dimension: i8) -> Option<Insets> {
    let mut min_x = dimension;
    let mut max_x = -1;
    let mut min_y = dimension;
    let mut max_y = -1;

    let mut y = 0;
    while y < dimension {
        let mut x = 0;
        while x < dimension {
            if mask_bit(mask, dimension, x, y) {
                if x < min_x {
                    min_x = x;
                }
                if x > max_x {
                    max_x = x;
                }
                if y < min_y {
                    min_y = y;
                }
                if y > max_y {
                    max_y = y;
                }
            }
            x += 1;
        }
        y += 1;
    }

    if max_x < 0 {
        return None;
    }
    Some(Insets {
        left: min_x,
        right: dimension - 1 - max_x,
        top: min_y,
        bottom: dimension - 1 - max_y,
    })
}

const fn build_insets() -> [[Insets; 4]; 7] {
    let empty = Insets {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
    };
    let mut table = [[empty; 4]; 7];
    let mut k = 0;
    while k < 7 {
        let mut r = 0;
        while r < 4 {
            table[k][r] = match scan_insets(&CATALOG[k].masks[r], CATALOG[k].dimension) {
                Some(insets) => insets,
                None => panic!("piece catalog contains an empty rotation mask"),
            };
            r += 1;
        }
        k += 1;
    }
    table
}

const fn build_shapes() -> [[PieceShape; 4]; 7] {
    let mut table = [[[(0, 0); 4]; 4]; 7];
    let mut k = 0;
    while k < 7 {
        let def = &CATALOG[k];
        let mut r = 0;
        while r < 4 {
            let mut n = 0;
            let mut y = 0;
            while y < def.dimension {
                let mut x = 0;
                while x < def.dimension {
                    if mask_bit(&def.masks[r], def.dimension, x, y) {
                        if n == 4 {
                            panic!("piece catalog mask has more than four cells");
                        }
                        table[k][r][n] = (x, y);
                        n += 1;
                    }
                    x += 1;
                }
                y += 1;
            }
            if n != 4 {
                panic!("piece catalog mask has fewer than four cells");
            }
            r += 1;
        }
        k += 1;
    }
    table
}

const INSETS: [[Insets; 4]; 7] = build_insets();
const SHAPES: [[PieceShape; 4]; 7] = build_shapes();

static PIECES: [PieceDef; 7] = CATALOG;

/// Bounding box side length (I=4, O=2, others 3)
pub fn dimension(kind: PieceKind) -> i8 {
    PIECES[kind.index()].dimension
}

/// Raw rotation mask for a piece kind
pub fn mask(kind: PieceKind, rotation: Rotation) -> &'static RotationMask {
    &PIECES[kind.index()].masks[rotation.index()]
}

/// Whether local cell `(x, y)` of the bounding box is occupied.
/// Coordinates outside the bounding box are never occupied.
pub fn is_occupied(kind: PieceKind, x: i8, y: i8, rotation: Rotation) -> bool {
    mask_bit(mask(kind, rotation), dimension(kind), x, y)
}

pub fn insets(kind: PieceKind, rotation: Rotation) -> Insets {
    INSETS[kind.index()][rotation.index()]
}

/// Get the shape (mino offsets, row-major) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index()]
}

/// Occupied local cells of a rotation, row-major
pub fn cells(kind: PieceKind, rotation: Rotation) -> impl Iterator<Item = MinoOffset> {
    get_shape(kind, rotation).into_iter()
}

/// Column of the bounding box when a piece enters the board
pub fn spawn_column(kind: PieceKind) -> i8 {
    5 - dimension(kind) / 2
}

/// Row of the bounding box when a piece enters the board
pub fn spawn_row(kind: PieceKind) -> i8 {
    insets(kind, Rotation::North).top
}
