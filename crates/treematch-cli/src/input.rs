//! Prediction/gold file loading and alignment.

use std::path::Path;

use anyhow::{bail, Context, Result};

/// One scored (prediction, gold) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalPair {
    pub pred: String,
    pub gold: String,
    pub db_id: String,
}

/// Loads both files and groups aligned pairs into conversations.
///
/// Blank lines delimit conversations in the gold file. A prediction file
/// without those separators is re-aligned by injecting blanks at the gold
/// file's blank positions.
pub fn load_pairs(pred_path: &Path, gold_path: &Path) -> Result<Vec<Vec<EvalPair>>> {
    let preds = std::fs::read_to_string(pred_path)
        .with_context(|| format!("reading predictions from {}", pred_path.display()))?;
    let golds = std::fs::read_to_string(gold_path)
        .with_context(|| format!("reading gold queries from {}", gold_path.display()))?;

    let mut preds: Vec<&str> = preds.lines().collect();
    let golds: Vec<&str> = golds.lines().collect();

    if preds.last().is_some_and(|line| line.trim().is_empty()) {
        preds.pop();
    }
    if preds.len() != golds.len() {
        for (index, line) in golds.iter().enumerate() {
            if line.trim().is_empty() && index <= preds.len() {
                preds.insert(index, "");
            }
        }
    }
    if preds.len() != golds.len() {
        bail!(
            "prediction count ({}) does not match gold count ({})",
            preds.len(),
            golds.len()
        );
    }

    let mut conversations = Vec::new();
    let mut current = Vec::new();
    for (pred, gold) in preds.iter().zip(&golds) {
        if gold.trim().is_empty() {
            if !current.is_empty() {
                conversations.push(std::mem::take(&mut current));
            }
            continue;
        }
        let (sql, db_id) = gold
            .split_once('\t')
            .with_context(|| format!("gold line without a db id: {gold:?}"))?;
        current.push(EvalPair {
            pred: pred.trim().to_owned(),
            gold: sql.trim().to_owned(),
            db_id: db_id.trim().to_owned(),
        });
    }
    if !current.is_empty() {
        conversations.push(current);
    }
    Ok(conversations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(content.as_bytes()).expect("write file");
        path
    }

    #[test]
    fn groups_conversations_on_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pred = write_file(&dir, "pred.txt", "select 1\nselect 2\n\nselect 3\n");
        let gold = write_file(
            &dir,
            "gold.txt",
            "select 1\tdb_a\nselect 2\tdb_a\n\nselect 3\tdb_b\n",
        );
        let conversations = load_pairs(&pred, &gold).expect("load");
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].len(), 2);
        assert_eq!(conversations[1].len(), 1);
        assert_eq!(conversations[1][0].db_id, "db_b");
    }

    #[test]
    fn aligns_predictions_missing_the_separators() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pred = write_file(&dir, "pred.txt", "select 1\nselect 2\nselect 3\n");
        let gold = write_file(
            &dir,
            "gold.txt",
            "select 1\tdb_a\nselect 2\tdb_a\n\nselect 3\tdb_b\n",
        );
        let conversations = load_pairs(&pred, &gold).expect("load");
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[1][0].pred, "select 3");
    }

    #[test]
    fn rejects_gold_lines_without_db_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pred = write_file(&dir, "pred.txt", "select 1\n");
        let gold = write_file(&dir, "gold.txt", "select 1\n");
        assert!(load_pairs(&pred, &gold).is_err());
    }
}
