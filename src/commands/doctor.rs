// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::integrity::check_integrity;
use crate::store::TableStore;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle<S: TableStore>(store: &S) -> Result<()> {
    let rows: Vec<Vec<String>> = check_integrity(store)?
        .into_iter()
        .map(|i| vec![i.kind.to_string(), i.detail])
        .collect();

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
