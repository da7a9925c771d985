//! ISCC-SUM processor: fans a single `update` stream out to the Data-Code
//! and Instance-Code processors, then packs a header plus both bodies into
//! the `"ISCC:"`-prefixed base32 text form.

use data_encoding::BASE32_NOPAD;

use crate::datacode::DataCodeProcessor;
use crate::instancecode::InstanceCodeProcessor;

/// ISCC main-type nibble for the composite ISCC-SUM header.
const MAIN_TYPE_ISCC_SUM: u8 = 0b0101;
/// Subtype nibble selecting the narrow (128-bit) body.
const SUBTYPE_NARROW: u8 = 0b0101;
/// Subtype nibble selecting the wide (256-bit) body.
const SUBTYPE_WIDE: u8 = 0b0111;

/// ISO 24138:2024 main-type nibbles for the standalone Data-Code and
/// Instance-Code unit headers emitted under `--units`.
const MAIN_TYPE_DATA: u8 = 0b0011;
const MAIN_TYPE_INSTANCE: u8 = 0b0100;
/// Standalone units carry no subtype distinction.
const UNIT_SUBTYPE_NONE: u8 = 0b0000;

/// Version/length nibbles are zero for every header this crate emits; see
/// DESIGN.md for why the exact ISO length-nibble encoding for standalone
/// units was not adopted (it is flagged as unresolved upstream).
const VERSION_LENGTH_BYTE: u8 = 0x00;

fn pack_header(main_type: u8, subtype: u8) -> [u8; 2] {
    [(main_type << 4) | subtype, VERSION_LENGTH_BYTE]
}

fn render(header: [u8; 2], body: &[&[u8]]) -> String {
    let mut packed = Vec::with_capacity(2 + body.iter().map(|b| b.len()).sum::<usize>());
    packed.extend_from_slice(&header);
    for b in body {
        packed.extend_from_slice(b);
    }
    format!("ISCC:{}", BASE32_NOPAD.encode(&packed).to_uppercase())
}

/// A standalone, full-width (256-bit) Data-Code or Instance-Code ISCC,
/// emitted alongside the main ISCC-SUM line under `--units`.
pub fn render_data_unit(wide_body: &[u8; 32]) -> String {
    render(pack_header(MAIN_TYPE_DATA, UNIT_SUBTYPE_NONE), &[wide_body])
}

pub fn render_instance_unit(wide_body: &[u8; 32]) -> String {
    render(pack_header(MAIN_TYPE_INSTANCE, UNIT_SUBTYPE_NONE), &[wide_body])
}

/// Result of processing one stream.
pub struct ProcessorResult {
    pub iscc: String,
    pub datahash: String,
    pub filesize: u64,
    pub units: Option<(String, String)>,
}

/// Single-entry façade: `update` fans out to the Data-Code and
/// Instance-Code processors; `result` packs the final record.
pub struct IsccSumProcessor {
    data: DataCodeProcessor,
    instance: InstanceCodeProcessor,
}

impl IsccSumProcessor {
    pub fn new() -> Self {
        Self {
            data: DataCodeProcessor::new(),
            instance: InstanceCodeProcessor::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.data.update(data);
        self.instance.update(data);
    }

    /// Finalize and produce the result record. `wide` selects the
    /// ISCC-SUM's own body width; `add_units` additionally emits full-width
    /// standalone Data-Code/Instance-Code units regardless of `wide`.
    pub fn result(self, wide: bool, add_units: bool) -> ProcessorResult {
        let filesize = self.instance.byte_count();
        let datahash = self.instance.hash().to_hex().to_string();

        // Each lane's narrow bit is the low bit of its wide nibble, so
        // finalizing wide once and slicing down covers both widths.
        let data_wide = self.data.finalize(true);
        let instance_wide = self.instance.finalize(true);

        // The composite body is 8+8 bytes (narrow) or 16+16 bytes (wide),
        // half the width of the full 256-bit sketch/digest. Full 32-byte
        // bodies only appear in the standalone `--units` codes.
        let data_body: Vec<u8> = if wide {
            data_wide[..16].to_vec()
        } else {
            narrow_from_wide_data(&data_wide)
        };
        let instance_body: Vec<u8> = if wide {
            instance_wide[..16].to_vec()
        } else {
            instance_wide[..8].to_vec()
        };

        let header = pack_header(
            MAIN_TYPE_ISCC_SUM,
            if wide { SUBTYPE_WIDE } else { SUBTYPE_NARROW },
        );
        let iscc = render(header, &[&data_body, &instance_body]);

        let units = if add_units {
            let mut data_wide_arr = [0u8; 32];
            data_wide_arr.copy_from_slice(&data_wide);
            let mut instance_wide_arr = [0u8; 32];
            instance_wide_arr.copy_from_slice(&instance_wide);
            Some((
                render_data_unit(&data_wide_arr),
                render_instance_unit(&instance_wide_arr),
            ))
        } else {
            None
        };

        ProcessorResult {
            iscc,
            datahash,
            filesize,
            units,
        }
    }
}

impl Default for IsccSumProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the narrow (8-byte, low-bit-per-lane) Data-Code from the wide
/// (32-byte, low-nibble-per-lane) one: each lane's low bit is the low bit of
/// its low nibble, so this is a pure bit-selection, not a re-hash.
fn narrow_from_wide_data(wide: &[u8]) -> Vec<u8> {
    let mut bits: u64 = 0;
    for byte in wide {
        let hi_nibble_bit = (byte >> 4) & 1;
        let lo_nibble_bit = byte & 1;
        bits = (bits << 1) | hi_nibble_bit as u64;
        bits = (bits << 1) | lo_nibble_bit as u64;
    }
    bits.to_be_bytes().to_vec()
}
