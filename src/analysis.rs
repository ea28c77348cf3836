use crate::error::AnalysisError;
use crate::Float;
use itertools::izip;

#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    I(Vec<i32>),
    D(Vec<Float>),
    S(Vec<String>),
}

impl ColumnData {
    fn type_name(&self) -> &'static str {
        match self {
            ColumnData::I(_) => "int",
            ColumnData::D(_) => "double",
            ColumnData::S(_) => "string",
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::I(v) => v.len(),
            ColumnData::D(v) => v.len(),
            ColumnData::S(v) => v.len(),
        }
    }

    fn empty_like(&self) -> ColumnData {
        match self {
            ColumnData::I(_) => ColumnData::I(Vec::new()),
            ColumnData::D(_) => ColumnData::D(Vec::new()),
            ColumnData::S(_) => ColumnData::S(Vec::new()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

#[derive(Clone, Debug, PartialEq)]
enum Cell {
    I(i32),
    D(Float),
    S(String),
}

impl Cell {
    fn type_name(&self) -> &'static str {
        match self {
            Cell::I(_) => "int",
            Cell::D(_) => "double",
            Cell::S(_) => "string",
        }
    }
}

/// Column-oriented analysis table.
///
/// Values are staged per column with the `fill_*_column` calls and become a
/// row on `add_row`. A column that was not filled gets 0, 0.0 or "".
#[derive(Clone, Debug, PartialEq)]
pub struct Ntuple {
    name: String,
    title: String,
    columns: Vec<Column>,
    staged: Vec<Option<Cell>>,
}

impl Ntuple {
    pub fn new(name: &str, title: &str) -> Ntuple {
        Ntuple {
            name: name.to_string(),
            title: title.to_string(),
            columns: Vec::new(),
            staged: Vec::new(),
        }
    }

    fn create_column(&mut self, name: &str, data: ColumnData) -> usize {
        self.columns.push(Column {
            name: name.to_string(),
            data,
        });
        self.staged.push(None);
        self.columns.len() - 1
    }

    pub fn create_i_column(&mut self, name: &str) -> usize {
        self.create_column(name, ColumnData::I(Vec::new()))
    }

    pub fn create_d_column(&mut self, name: &str) -> usize {
        self.create_column(name, ColumnData::D(Vec::new()))
    }

    pub fn create_s_column(&mut self, name: &str) -> usize {
        self.create_column(name, ColumnData::S(Vec::new()))
    }

    fn stage(&mut self, index: usize, cell: Cell) -> Result<(), AnalysisError> {
        let column = self
            .columns
            .get(index)
            .ok_or_else(|| AnalysisError::NoSuchColumn {
                ntuple: self.name.clone(),
                index,
            })?;
        let matches = matches!(
            (&column.data, &cell),
            (ColumnData::I(_), Cell::I(_))
                | (ColumnData::D(_), Cell::D(_))
                | (ColumnData::S(_), Cell::S(_))
        );
        if !matches {
            return Err(AnalysisError::WrongColumnType {
                ntuple: self.name.clone(),
                index,
                expected: column.data.type_name(),
                found: cell.type_name(),
            });
        }
        self.staged[index] = Some(cell);
        Ok(())
    }

    pub fn fill_i_column(&mut self, index: usize, value: i32) -> Result<(), AnalysisError> {
        self.stage(index, Cell::I(value))
    }

    pub fn fill_d_column(&mut self, index: usize, value: Float) -> Result<(), AnalysisError> {
        self.stage(index, Cell::D(value))
    }

    pub fn fill_s_column(&mut self, index: usize, value: &str) -> Result<(), AnalysisError> {
        self.stage(index, Cell::S(value.to_string()))
    }

    /// Commits the staged values as one row.
    pub fn add_row(&mut self) {
        for (column, cell) in izip!(self.columns.iter_mut(), self.staged.iter_mut()) {
            match (&mut column.data, cell.take()) {
                (ColumnData::I(v), Some(Cell::I(x))) => v.push(x),
                (ColumnData::D(v), Some(Cell::D(x))) => v.push(x),
                (ColumnData::S(v), Some(Cell::S(x))) => v.push(x),
                // stage() only accepts matching types, so this is "not filled"
                (ColumnData::I(v), _) => v.push(0),
                (ColumnData::D(v), _) => v.push(0.0),
                (ColumnData::S(v), _) => v.push(String::new()),
            }
        }
    }

    /// Appends the rows of `other`, which must have the same columns.
    pub fn merge(&mut self, other: Ntuple) -> Result<(), AnalysisError> {
        let same_layout = self.columns.len() == other.columns.len()
            && self.columns.iter().zip(other.columns.iter()).all(|(a, b)| {
                a.name == b.name && a.data.type_name() == b.data.type_name()
            });
        if !same_layout {
            return Err(AnalysisError::SchemaMismatch {
                ntuple: self.name.clone(),
                other: other.name,
            });
        }
        for (mine, theirs) in self.columns.iter_mut().zip(other.columns.into_iter()) {
            match (&mut mine.data, theirs.data) {
                (ColumnData::I(a), ColumnData::I(b)) => a.extend(b),
                (ColumnData::D(a), ColumnData::D(b)) => a.extend(b),
                (ColumnData::S(a), ColumnData::S(b)) => a.extend(b),
                _ => unreachable!("layouts were compared above"),
            }
        }
        Ok(())
    }

    /// Same columns, no rows.
    pub fn empty_copy(&self) -> Ntuple {
        Ntuple {
            name: self.name.clone(),
            title: self.title.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data: c.data.empty_like(),
                })
                .collect(),
            staged: vec![None; self.columns.len()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.data)
    }

    pub fn entries(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }
}
