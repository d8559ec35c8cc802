//! Column letter codes used to mark significant differences.

use crate::cell_ref::col_to_letter;

/// Letters for `n` columns: `A..Z`, or `AA, AB, ...` once a group has more
/// than 26 columns.
#[must_use]
pub fn letter_codes(n: usize) -> Vec<String> {
    let offset = if n > 26 { 26 } else { 0 };
    (0..n)
        .map(|i| u32::try_from(i + offset).map_or_else(|_| String::new(), col_to_letter))
        .collect()
}

/// Letter accumulator for one column group.
///
/// When two columns differ, the column with the higher proportion receives
/// the letter of the other.
#[derive(Debug, Clone)]
pub struct GroupLetters {
    codes: Vec<String>,
    marks: Vec<Vec<String>>,
}

impl GroupLetters {
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self {
            codes: letter_codes(columns),
            marks: vec![Vec::new(); columns],
        }
    }

    /// Record that columns `i` and `j` differ; `p_i > p_j` decides the winner.
    pub fn mark(&mut self, i: usize, j: usize, i_higher: bool) {
        let (winner, loser) = if i_higher { (i, j) } else { (j, i) };
        let Some(code) = self.codes.get(loser).cloned() else {
            return;
        };
        if let Some(marks) = self.marks.get_mut(winner) {
            marks.push(code);
        }
    }

    /// Comma-joined letters per column, empty when nothing was marked.
    #[must_use]
    pub fn finish(self) -> Vec<String> {
        self.marks.into_iter().map(|m| m.join(",")).collect()
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn short_groups_use_single_letters() {
        assert_eq!(letter_codes(3), vec!["A", "B", "C"]);
        assert_eq!(letter_codes(26)[25], "Z");
    }

    #[test]
    fn wide_groups_use_two_letters() {
        let codes = letter_codes(28);
        assert_eq!(codes[0], "AA");
        assert_eq!(codes[1], "AB");
        assert_eq!(codes[27], "BB");
    }

    #[test]
    fn higher_proportion_takes_lower_letter() {
        let mut letters = GroupLetters::new(3);
        letters.mark(0, 1, false);
        letters.mark(0, 2, false);
        letters.mark(1, 2, true);
        assert_eq!(letters.finish(), vec!["", "A,C", "A"]);
    }
}
