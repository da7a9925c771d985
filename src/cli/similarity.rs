//! Similarity clustering: greedy single-pass grouping by Hamming distance
//! on Data-Code bits.

use std::io::{self, Write};

use super::format::LineWriter;

/// One file's Data-Code bits, extracted from its packed ISCC-SUM bytes.
/// Header is 2 bytes; the Data-Code body is the first half of the
/// remaining payload (narrow: 8 bytes, wide: 16 bytes).
fn data_code_bits(packed: &[u8]) -> &[u8] {
    let body = &packed[2..];
    &body[..body.len() / 2]
}

fn hamming_distance(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

struct Group {
    reference: usize,
    members: Vec<(usize, u32)>,
}

/// `files` is `(display_path, packed_iscc_bytes)` in input order. Returns
/// groups with ≥2 members; the reference is each group's first file, and
/// other members are sorted by ascending distance, ties broken by input
/// order (stable sort preserves this automatically).
fn cluster(files: &[(String, Vec<u8>)], threshold: u32) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for (i, (_, packed)) in files.iter().enumerate() {
        let bits = data_code_bits(packed);
        let joined = groups.iter_mut().find(|g| {
            let ref_bits = data_code_bits(&files[g.reference].1);
            hamming_distance(bits, ref_bits) <= threshold
        });
        match joined {
            Some(group) => {
                let ref_bits = data_code_bits(&files[group.reference].1);
                let distance = hamming_distance(bits, ref_bits);
                group.members.push((i, distance));
            }
            None => groups.push(Group {
                reference: i,
                members: Vec::new(),
            }),
        }
    }
    for group in &mut groups {
        group.members.sort_by_key(|&(_, distance)| distance);
    }
    groups
}

/// One file entered into clustering: its display path, the decoded packed
/// ISCC bytes (for Hamming distance), and the rendered ISCC text (for
/// output).
pub struct Candidate {
    pub display: String,
    pub packed: Vec<u8>,
    pub iscc: String,
}

/// Run clustering and write the grouped report via `writer`.
pub fn run<W: Write>(
    files: &[Candidate],
    threshold: u32,
    writer: &mut LineWriter<W>,
) -> io::Result<()> {
    let slim: Vec<(String, Vec<u8>)> = files
        .iter()
        .map(|c| (c.display.clone(), c.packed.clone()))
        .collect();
    let groups = cluster(&slim, threshold);

    let mut first = true;
    for group in groups {
        if group.members.is_empty() {
            continue;
        }
        if !first {
            writer.write_blank()?;
        }
        first = false;

        let reference = &files[group.reference];
        writer.write_main(&reference.iscc, &reference.display)?;
        for (idx, distance) in group.members {
            let member = &files[idx];
            writer.write_similarity_member(distance, &member.iscc, &member.display)?;
        }
    }
    Ok(())
}
