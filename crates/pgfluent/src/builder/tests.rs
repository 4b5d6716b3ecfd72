use super::*;
use crate::params;
use crate::placeholder::PlaceholderStyle;

// ==================== SELECT ====================

#[test]
fn test_select_all() {
    let q = SqlBuilder::new().select_all().from("users").build();
    assert_eq!(q.sql, "SELECT * FROM users");
    assert!(q.params.is_empty());
}

#[test]
fn test_select_empty_column_list_is_star() {
    let q = select(Vec::<&str>::new()).from("users").build();
    assert_eq!(q.sql, "SELECT * FROM users");
}

#[test]
fn test_select_columns() {
    let q = select(["a", "b"]).from("t").build();
    assert_eq!(q.sql, "SELECT a, b FROM t");
}

#[test]
fn test_select_columns_accumulate() {
    let q = select(["id"]).select(["name"]).from("users").build();
    assert_eq!(q.sql, "SELECT id, name FROM users");
}

#[test]
fn test_select_without_table_omits_from() {
    let q = select(["1 + 1"]).build();
    assert_eq!(q.sql, "SELECT 1 + 1");
}

#[test]
fn test_select_where_renumbers() {
    let q = select(["id", "name"])
        .from("users")
        .and_where("age > ?", 18)
        .and_where("status = ?", "active")
        .build();
    assert_eq!(
        q.sql,
        "SELECT id, name FROM users WHERE age > $1 AND status = $2"
    );
    assert_eq!(q.params, params![18, "active"]);
}

#[test]
fn test_select_full_scenario() {
    let q = select(["id", "name"])
        .from("users")
        .and_where("age > ?", 18)
        .and_where("status = ?", "active")
        .order_by("created_at DESC")
        .limit(10)
        .offset(20)
        .build();
    assert_eq!(
        q.sql,
        "SELECT id, name FROM users WHERE age > $1 AND status = $2 ORDER BY created_at DESC LIMIT 10 OFFSET 20"
    );
    assert_eq!(q.params, vec![Value::Int(18), Value::Text("active".into())]);
}

#[test]
fn test_limit_offset_unset_are_omitted() {
    let q = select(["id"]).from("users").order_by("id").build();
    assert_eq!(q.sql, "SELECT id FROM users ORDER BY id");
}

#[test]
fn test_negative_limit_clears_clause() {
    let q = select(["id"]).from("users").limit(10).limit(-1).offset(-5).build();
    assert_eq!(q.sql, "SELECT id FROM users");
}

#[test]
fn test_zero_limit_offset_render_literally() {
    let q = select(["id"]).from("users").limit(0).offset(0).build();
    assert_eq!(q.sql, "SELECT id FROM users LIMIT 0 OFFSET 0");
    assert!(q.params.is_empty());
}

#[test]
fn test_order_by_last_write_wins() {
    let q = select(["id"])
        .from("users")
        .order_by("id")
        .order_by("name DESC")
        .build();
    assert_eq!(q.sql, "SELECT id FROM users ORDER BY name DESC");
}

#[test]
fn test_where_with_several_markers() {
    let q = select(["id"])
        .from("products")
        .and_where("category = ?", "tools")
        .and_where_args("price BETWEEN ? AND ?", params![10, 99.5])
        .and_where_raw("deleted_at IS NULL")
        .and_where("owner = ?", "bob")
        .build();
    assert_eq!(
        q.sql,
        "SELECT id FROM products WHERE category = $1 AND price BETWEEN $2 AND $3 AND deleted_at IS NULL AND owner = $4"
    );
    assert_eq!(q.params, params!["tools", 10, 99.5, "bob"]);
}

#[test]
fn test_marker_and_param_counts_agree() {
    let templates: [(&str, usize); 5] = [
        ("a = ?", 1),
        ("b IN (?, ?, ?)", 3),
        ("c IS NULL", 0),
        ("d BETWEEN ? AND ?", 2),
        ("e = ? OR e = ?", 2),
    ];
    let mut qb = select(["id"]).from("t");
    let mut next = 0i64;
    for (template, k) in templates {
        let args: Vec<i64> = (0..k as i64).map(|i| next + i).collect();
        next += k as i64;
        qb = qb.and_where_args(template, args);
    }
    let q = qb.build();

    let total: usize = templates.iter().map(|(_, k)| k).sum();
    assert_eq!(q.params.len(), total);
    for i in 1..=total {
        assert!(q.sql.contains(&format!("${i}")), "missing ${i} in {}", q.sql);
    }
    assert!(!q.sql.contains(&format!("${}", total + 1)));
    assert!(!q.sql.contains('?'));
    let expected: Vec<Value> = (0..total as i64).map(Value::Int).collect();
    assert_eq!(q.params, expected);
}

#[test]
fn test_call_order_does_not_matter() {
    let a = select(["id"])
        .from("users")
        .and_where("id = ?", 1)
        .limit(5)
        .build();
    let b = SqlBuilder::new()
        .limit(5)
        .and_where("id = ?", 1)
        .from("users")
        .select(["id"])
        .build();
    assert_eq!(a, b);
}

#[test]
fn test_quoted_marker_is_left_alone() {
    let q = select(["id"])
        .from("posts")
        .and_where_raw("title <> 'why?'")
        .and_where("id = ?", 7)
        .build();
    assert_eq!(q.sql, "SELECT id FROM posts WHERE title <> 'why?' AND id = $1");
    assert_eq!(q.params, params![7]);
}

#[test]
fn test_escape_string_marker_is_left_alone() {
    let qb = select(["id"])
        .from("t")
        .and_where(r"a = E'it\'s?' AND id = ?", 1);
    let q = qb.try_build().unwrap();
    assert_eq!(q.sql, r"SELECT id FROM t WHERE a = E'it\'s?' AND id = $1");
    assert_eq!(q.params, params![1]);
    assert_eq!(qb.build(), q);
}

#[test]
fn test_naive_scan_config() {
    let q = select(["id"])
        .from("posts")
        .with_config(QbConfig::new().literal_aware(false))
        .and_where_raw("title <> 'why?'")
        .build();
    assert_eq!(q.sql, "SELECT id FROM posts WHERE title <> 'why$1'");
}

#[test]
fn test_question_style() {
    let q = update("t")
        .with_config(QbConfig::new().placeholder_style(PlaceholderStyle::Question))
        .set("a = ?", 1)
        .and_where("id = ?", 2)
        .build();
    assert_eq!(q.sql, "UPDATE t SET a = ? WHERE id = ?");
    assert_eq!(q.params, params![1, 2]);
}

#[test]
fn test_where_opt_skips_none() {
    let status: Option<&str> = None;
    let q = select(["id"])
        .from("users")
        .and_where_opt("status = ?", status)
        .and_where_opt("age > ?", Some(18))
        .build();
    assert_eq!(q.sql, "SELECT id FROM users WHERE age > $1");
    assert_eq!(q.params, params![18]);
}

#[test]
fn test_page() {
    let q = select(["id"]).from("users").page(3, 25).unwrap().build();
    assert_eq!(q.sql, "SELECT id FROM users LIMIT 25 OFFSET 50");
}

#[test]
fn test_page_rejects_zero() {
    let err = select(["id"]).from("users").page(0, 25).unwrap_err();
    assert!(matches!(err, QbError::Validation(_)));
}

// ==================== INSERT ====================

#[test]
fn test_insert_basic() {
    let q = insert("users")
        .columns(["name", "email", "age"])
        .values(params!["John Doe", "john@example.com", 30])
        .build();
    assert_eq!(
        q.sql,
        "INSERT INTO users (name, email, age) VALUES ($1, $2, $3)"
    );
    assert_eq!(q.params, params!["John Doe", "john@example.com", 30]);
}

#[test]
fn test_insert_without_columns() {
    let q = insert("users")
        .values(params!["John Doe", "john@example.com", 30])
        .build();
    assert_eq!(q.sql, "INSERT INTO users VALUES ($1, $2, $3)");
    assert_eq!(q.params.len(), 3);
}

#[test]
fn test_insert_placeholders_follow_value_count() {
    // More values than columns: still one placeholder per value.
    let q = insert("t").columns(["a"]).value(1).value(2).build();
    assert_eq!(q.sql, "INSERT INTO t (a) VALUES ($1, $2)");
    assert_eq!(q.params, params![1, 2]);
}

#[test]
fn test_insert_returning() {
    let q = insert("products")
        .columns(["name", "price", "category"])
        .values(params!["Laptop", 999.99, "electronics"])
        .returning(["id", "created_at"])
        .build();
    assert_eq!(
        q.sql,
        "INSERT INTO products (name, price, category) VALUES ($1, $2, $3) RETURNING id, created_at"
    );
}

#[test]
fn test_insert_with_null_and_array() {
    let tags = vec!["new".to_string(), "sale".to_string()];
    let q = insert("products")
        .columns(["description", "tags"])
        .value(None::<String>)
        .value(tags.clone())
        .build();
    assert_eq!(q.params, vec![Value::Null, Value::TextArray(tags)]);
}

// ==================== UPDATE ====================

#[test]
fn test_update_numbering_continues_from_set_to_where() {
    let q = update("t")
        .set("a = ?", 1)
        .set("b = ?", 2)
        .and_where("id = ?", 3)
        .build();
    assert_eq!(q.sql, "UPDATE t SET a = $1, b = $2 WHERE id = $3");
    assert_eq!(q.params, params![1, 2, 3]);
}

#[test]
fn test_update_where_before_set_still_numbers_set_first() {
    let q = update("t")
        .and_where("id = ?", 3)
        .set("a = ?", 1)
        .build();
    assert_eq!(q.sql, "UPDATE t SET a = $1 WHERE id = $2");
    assert_eq!(q.params, params![1, 3]);
}

#[test]
fn test_update_returning_and_raw_set() {
    let q = update("products")
        .set("price = ?", 899.99)
        .set_raw("updated_at = now()")
        .set_opt("name = ?", None::<&str>)
        .and_where("id = ?", 123)
        .returning(["id"])
        .build();
    assert_eq!(
        q.sql,
        "UPDATE products SET price = $1, updated_at = now() WHERE id = $2 RETURNING id"
    );
    assert_eq!(q.params, params![899.99, 123]);
}

// ==================== DELETE ====================

#[test]
fn test_delete_basic() {
    let q = delete().from("users").and_where("id = ?", 123).build();
    assert_eq!(q.sql, "DELETE FROM users WHERE id = $1");
    assert_eq!(q.params, params![123]);
}

#[test]
fn test_delete_returning() {
    let q = delete()
        .from("users")
        .and_where("id = ?", 123)
        .and_where("tenant = ?", "acme")
        .returning(["id"])
        .build();
    assert_eq!(
        q.sql,
        "DELETE FROM users WHERE id = $1 AND tenant = $2 RETURNING id"
    );
}

// ==================== Builder semantics ====================

#[test]
fn test_unset_builds_empty() {
    let q = SqlBuilder::new().build();
    assert_eq!(q.sql, "");
    assert!(q.params.is_empty());
    assert_eq!(SqlBuilder::new().statement_kind(), StatementKind::Unset);
}

#[test]
fn test_build_is_idempotent() {
    let qb = update("t").set("a = ?", 1).and_where("id = ?", 2);
    assert_eq!(qb.build(), qb.build());
}

#[test]
fn test_last_entry_wins() {
    let qb = select(["id"]).from("users").delete();
    assert_eq!(qb.statement_kind(), StatementKind::Delete);
    assert_eq!(qb.build().sql, "DELETE FROM users");
}

#[test]
fn test_mismatched_state_is_ignored_by_build() {
    let q = select(["id"])
        .from("users")
        .set("a = ?", 1)
        .returning(["id"])
        .build();
    assert_eq!(q.sql, "SELECT id FROM users");
    assert!(q.params.is_empty());
}

#[test]
fn test_branches_do_not_share_clauses() {
    let base = select(["id", "name", "price"])
        .from("products")
        .and_where("status = ?", "active");

    let cheap = base.clone().and_where("price < ?", 10);
    let tools = base.clone().and_where("category = ?", "tools");

    assert_eq!(
        cheap.build().sql,
        "SELECT id, name, price FROM products WHERE status = $1 AND price < $2"
    );
    assert_eq!(
        tools.build().sql,
        "SELECT id, name, price FROM products WHERE status = $1 AND category = $2"
    );
    assert_eq!(tools.build().params, params!["active", "tools"]);
    assert_eq!(
        base.build().sql,
        "SELECT id, name, price FROM products WHERE status = $1"
    );
}

// ==================== Strict render ====================

#[test]
fn test_try_build_ok() {
    let q = update("t")
        .set("a = ?", 1)
        .and_where("id = ?", 2)
        .try_build()
        .unwrap();
    assert_eq!(q.sql, "UPDATE t SET a = $1 WHERE id = $2");
}

#[test]
fn test_try_build_unset() {
    let err = SqlBuilder::new().try_build().unwrap_err();
    assert!(matches!(err, QbError::MalformedQuery(_)));
}

#[test]
fn test_try_build_placeholder_mismatch() {
    let err = select(["id"])
        .from("t")
        .and_where("a = ? AND b = ?", 1)
        .try_build()
        .unwrap_err();
    match err {
        QbError::PlaceholderMismatch {
            template,
            markers,
            args,
        } => {
            assert_eq!(template, "a = ? AND b = ?");
            assert_eq!(markers, 2);
            assert_eq!(args, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_try_build_quoted_marker_needs_no_arg() {
    assert!(
        select(["id"])
            .from("t")
            .and_where_raw("note = 'really?'")
            .try_build()
            .is_ok()
    );
}

#[test]
fn test_try_build_incompatible_operation() {
    let err = select(["id"])
        .from("t")
        .set("a = ?", 1)
        .try_build()
        .unwrap_err();
    assert!(matches!(
        err,
        QbError::IncompatibleOperation {
            operation: Operation::Set,
            kind: StatementKind::Select,
        }
    ));

    let err = insert("t").value(1).limit(5).try_build().unwrap_err();
    assert!(matches!(
        err,
        QbError::IncompatibleOperation {
            operation: Operation::Limit,
            kind: StatementKind::Insert,
        }
    ));
}

#[test]
fn test_try_build_insert_count_mismatch() {
    let err = insert("t")
        .columns(["a", "b"])
        .value(1)
        .try_build()
        .unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_try_build_requires_table() {
    let err = delete().and_where("id = ?", 1).try_build().unwrap_err();
    assert!(matches!(err, QbError::MalformedQuery(_)));
}

#[test]
fn test_try_build_update_requires_set() {
    let err = update("t").and_where("id = ?", 1).try_build().unwrap_err();
    assert!(matches!(err, QbError::MalformedQuery(_)));
    // The lenient path still renders it.
    assert_eq!(
        update("t").and_where("id = ?", 1).build().sql,
        "UPDATE t WHERE id = $1"
    );
}

#[test]
fn test_try_build_insert_requires_values() {
    let err = insert("t").try_build().unwrap_err();
    assert!(matches!(err, QbError::MalformedQuery(_)));

    let err = insert("t").columns(["a"]).try_build().unwrap_err();
    assert!(matches!(err, QbError::MalformedQuery(_)));
}

#[test]
fn test_transition_table() {
    assert!(StatementKind::Select.accepts(Operation::OrderBy));
    assert!(!StatementKind::Select.accepts(Operation::Returning));
    assert!(StatementKind::Update.accepts(Operation::Set));
    assert!(!StatementKind::Delete.accepts(Operation::Set));
    assert!(StatementKind::Insert.accepts(Operation::Returning));
    assert!(!StatementKind::Unset.accepts(Operation::Where));
}
