/// Schema Reflector Module
///
/// Reads live database metadata and reconstructs equivalent DDL text for
/// the three schema object kinds. Reflection is side-effect-free: a
/// database is only ever read, never modified, and objects in reserved
/// namespaces are filtered from every result.
///
/// Reconstruction rules follow the import dialect, so exported files feed
/// straight back through the build/update path: domains come out as flat
/// `CREATE DOMAIN` statements, tables as `CREATE TABLE` with
/// per-column length or precision refinements, procedures wrapped in the
/// terminator-switch envelope with `CREATE OR ALTER` semantics.
use crate::catalog::{self, DomainDef, ProcedureDef};
use crate::core::Result;
use rusqlite::Connection;

/// Name prefixes of database-internal objects excluded from export.
pub const SYSTEM_PREFIXES: &[&str] = &["sqlite_", "dbmeta_"];

/// True when the object name lives in a reserved namespace.
pub fn is_system_object(name: &str) -> bool {
    SYSTEM_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// The three exportable schema object kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Domain,
    Table,
    Procedure,
}

impl ObjectKind {
    /// File-name prefix; the classifier recognizes these on re-import.
    pub fn file_prefix(self) -> &'static str {
        match self {
            ObjectKind::Domain => "DOMAIN",
            ObjectKind::Table => "TABLE",
            ObjectKind::Procedure => "PROC",
        }
    }
}

/// A table column as reported by the catalog, with its declared type
/// split into the flat name and optional refinements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub type_name: String,
    pub char_length: Option<i64>,
    pub num_precision: Option<i64>,
    pub num_scale: Option<i64>,
    pub not_null: bool,
}

/// A table with its columns in catalog-reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<Column>,
}

/// A schema object rendered to its export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedObject {
    pub kind: ObjectKind,
    pub name: String,
    pub file_name: String,
    pub content: String,
}

/// Outcome of processing one catalog row: a malformed row is skipped with
/// a reason instead of aborting the surrounding export phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Rendered(RenderedObject),
    Skipped { name: String, reason: String },
}

/// Reads every user domain, ordered by name.
pub fn reflect_domains(conn: &Connection) -> Result<Vec<DomainDef>> {
    let domains = catalog::list_domains(conn)?;
    Ok(domains
        .into_iter()
        .filter(|d| !is_system_object(&d.name))
        .collect())
}

/// Reads every user table with its columns, ordered by name.
pub fn reflect_tables(conn: &Connection) -> Result<Vec<TableDef>> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut tables = Vec::new();
    for name in names {
        let name = name?.trim().to_string();
        if is_system_object(&name) {
            continue;
        }
        let columns = table_columns(conn, &name)?;
        tables.push(TableDef { name, columns });
    }
    Ok(tables)
}

/// Column metadata for one table, in catalog order.
fn table_columns(conn: &Connection, table_name: &str) -> Result<Vec<Column>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table_name))?;
    let rows = stmt.query_map([], |row| {
        let name: String = row.get(1)?;
        let declared: String = row.get(2)?;
        let not_null: bool = row.get(3)?;
        Ok((name, declared, not_null))
    })?;

    let mut columns = Vec::new();
    for row in rows {
        let (name, declared, not_null) = row?;
        let (type_name, char_length, num_precision, num_scale) = catalog::parse_type(&declared);
        columns.push(Column {
            name: name.trim().to_string(),
            type_name,
            char_length,
            num_precision,
            num_scale,
            not_null,
        });
    }
    Ok(columns)
}

/// Reads every routine row, ordered by name. Rows are returned raw; use
/// [`process_procedure_row`] to turn each into a file or a skip.
pub fn reflect_procedures(conn: &Connection) -> Result<Vec<ProcedureDef>> {
    let procedures = catalog::list_procedures(conn)?;
    Ok(procedures
        .into_iter()
        .filter(|p| !is_system_object(&p.name))
        .collect())
}

/// Renders a domain to its export file. The flat base type is emitted
/// without length or precision refinement.
pub fn render_domain(domain: &DomainDef) -> RenderedObject {
    let kind = ObjectKind::Domain;
    RenderedObject {
        kind,
        name: domain.name.clone(),
        file_name: format!("{}_{}.sql", kind.file_prefix(), domain.name),
        content: format!("CREATE DOMAIN {} AS {};", domain.name, domain.base_type),
    }
}

/// Renders a table to its export file.
pub fn render_table(table: &TableDef) -> RenderedObject {
    let column_defs: Vec<String> = table.columns.iter().map(render_column).collect();
    let kind = ObjectKind::Table;
    RenderedObject {
        kind,
        name: table.name.clone(),
        file_name: format!("{}_{}.sql", kind.file_prefix(), table.name),
        content: format!(
            "CREATE TABLE {} (\n{}\n);\n",
            table.name,
            column_defs.join(",\n")
        ),
    }
}

fn render_column(column: &Column) -> String {
    let upper = column.type_name.to_uppercase();
    let mut type_text = column.type_name.clone();

    if upper.contains("CHAR") {
        if let Some(length) = column.char_length {
            type_text.push_str(&format!("({length})"));
        }
    } else if upper.contains("DECIMAL") || upper.contains("NUMERIC") {
        if let Some(precision) = column.num_precision {
            let scale = column.num_scale.unwrap_or(0);
            type_text.push_str(&format!("({precision},{scale})"));
        }
    }

    let mut definition = format!("    {} {}", column.name, type_text);
    if column.not_null {
        definition.push_str(" NOT NULL");
    }
    definition
}

/// Turns one routine row into its export file, or a skip when the catalog
/// carries no source body.
pub fn process_procedure_row(procedure: &ProcedureDef) -> RowOutcome {
    if procedure.name.is_empty() {
        return RowOutcome::Skipped {
            name: String::new(),
            reason: "routine name is missing".to_string(),
        };
    }
    let source = match &procedure.source {
        Some(source) => source,
        None => {
            return RowOutcome::Skipped {
                name: procedure.name.clone(),
                reason: "routine source is NULL".to_string(),
            }
        }
    };

    let kind = ObjectKind::Procedure;
    RowOutcome::Rendered(RenderedObject {
        kind,
        name: procedure.name.clone(),
        file_name: format!("{}_{}.sql", kind.file_prefix(), procedure.name),
        content: format!(
            "SET TERM ^ ;\nCREATE OR ALTER PROCEDURE {}\n{}\n^\nSET TERM ; ^",
            procedure.name, source
        ),
    })
}
