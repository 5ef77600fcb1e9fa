//! [`Indices`]: named document indices kept in tantivy.
//!
//! Every document is stored as its JSON source next to its id and an
//! insertion sequence number. Fields declared filterable when an index is
//! created are also indexed as exact-match terms; [`Query::Term`] searches
//! only those. Hits come back in first-indexed order.
//!
//! Tantivy calls block, so each operation runs on the blocking pool. Writes
//! to one index are serialised through its writer and committed before they
//! return, so a read after a write always sees it.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use serde_json::Value;
use shelf_core::store::Page;
use tantivy::{
  Index, IndexReader, IndexWriter, ReloadPolicy, Searcher, TantivyDocument, Term,
  collector::DocSetCollector,
  directory::MmapDirectory,
  query::{AllQuery, TermQuery},
  schema::{Field, IndexRecordOption, NumericOptions, STORED, STRING, Schema, Value as _},
};
use tokio::sync::{Mutex, RwLock};

use crate::{Error, Result};

/// Indexing heap for each index writer, which runs a single thread.
const WRITER_HEAP_BYTES: usize = 20_000_000;

// ─── Query ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
  MatchAll,
  /// Exact match on a filterable field, named by its dotted path in the
  /// source, e.g. `category.id`.
  Term { field: String, value: String },
}

impl Query {
  pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
    Self::Term { field: field.into(), value: value.into() }
  }
}

/// A search result: the document id and its stored source.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
  pub id:     String,
  pub source: Value,
}

// ─── Schema ──────────────────────────────────────────────────────────────────

struct Fields {
  id:      Field,
  seq:     Field,
  source:  Field,
  /// Dotted source path → term field.
  filters: Vec<(String, Field)>,
}

impl Fields {
  fn schema(filterable: &[String]) -> (Schema, Self) {
    let mut builder = Schema::builder();
    let id = builder.add_text_field("_id", STRING | STORED);
    let seq = builder.add_u64_field(
      "_seq",
      NumericOptions::default().set_stored().set_indexed().set_fast(),
    );
    let source = builder.add_text_field("_source", STORED);
    let filters = filterable
      .iter()
      .map(|path| {
        let field = builder.add_text_field(&path.replace('.', "_"), STRING);
        (path.clone(), field)
      })
      .collect();
    (builder.build(), Self { id, seq, source, filters })
  }

  fn filter(&self, path: &str) -> Option<Field> {
    self
      .filters
      .iter()
      .find(|(candidate, _)| candidate == path)
      .map(|(_, field)| *field)
  }
}

fn lookup<'v>(source: &'v Value, path: &str) -> Option<&'v str> {
  source
    .pointer(&format!("/{}", path.replace('.', "/")))
    .and_then(Value::as_str)
}

// ─── One index ───────────────────────────────────────────────────────────────

struct Stored {
  id:     String,
  seq:    u64,
  source: Value,
}

struct Writer {
  inner:    IndexWriter,
  next_seq: u64,
}

struct DocIndex {
  name:   String,
  fields: Fields,
  reader: IndexReader,
  writer: Mutex<Writer>,
}

impl DocIndex {
  /// Open the index in `dir`, creating it if needed, or build one in memory
  /// when there is no directory. The flag is `true` for a new index.
  fn open(name: &str, dir: Option<PathBuf>, filterable: &[String]) -> Result<(Self, bool)> {
    let (schema, fields) = Fields::schema(filterable);
    let (index, created) = match dir {
      None => (Index::create_in_ram(schema), true),
      Some(dir) => {
        std::fs::create_dir_all(&dir)?;
        let created = !dir.join("meta.json").exists();
        (Index::open_or_create(MmapDirectory::open(&dir)?, schema)?, created)
      }
    };
    let reader: IndexReader = index
      .reader_builder()
      .reload_policy(ReloadPolicy::Manual)
      .try_into()?;
    let inner: IndexWriter = index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;

    let mut this = Self {
      name: name.to_owned(),
      fields,
      reader,
      writer: Mutex::new(Writer { inner, next_seq: 0 }),
    };
    let next_seq = this
      .matching(&this.reader.searcher(), &AllQuery)?
      .iter()
      .map(|stored| stored.seq + 1)
      .max()
      .unwrap_or(0);
    this.writer.get_mut().next_seq = next_seq;
    Ok((this, created))
  }

  fn id_term(&self, id: &str) -> Term { Term::from_field_text(self.fields.id, id) }

  fn decode(&self, doc: &TantivyDocument) -> Result<Stored> {
    let malformed = |field| Error::MalformedDocument { index: self.name.clone(), field };
    let id = doc
      .get_first(self.fields.id)
      .and_then(|v| v.as_str())
      .ok_or_else(|| malformed("_id"))?;
    let seq = doc
      .get_first(self.fields.seq)
      .and_then(|v| v.as_u64())
      .ok_or_else(|| malformed("_seq"))?;
    let source = doc
      .get_first(self.fields.source)
      .and_then(|v| v.as_str())
      .ok_or_else(|| malformed("_source"))?;
    Ok(Stored { id: id.to_owned(), seq, source: serde_json::from_str(source)? })
  }

  fn matching(&self, searcher: &Searcher, query: &dyn tantivy::query::Query) -> Result<Vec<Stored>> {
    searcher
      .search(query, &DocSetCollector)?
      .into_iter()
      .map(|address| self.decode(&searcher.doc::<TantivyDocument>(address)?))
      .collect()
  }

  fn find(&self, id: &str) -> Result<Option<Stored>> {
    let query = TermQuery::new(self.id_term(id), IndexRecordOption::Basic);
    Ok(self.matching(&self.reader.searcher(), &query)?.into_iter().next())
  }

  /// Run `ops` against the writer and commit, rolling back on failure.
  fn apply(
    &self,
    writer: &mut Writer,
    ops: impl FnOnce(&IndexWriter) -> tantivy::Result<()>,
  ) -> Result<()> {
    let outcome = ops(&writer.inner).and_then(|()| writer.inner.commit().map(|_| ()));
    if let Err(err) = outcome {
      if let Err(rollback) = writer.inner.rollback() {
        tracing::warn!(index = %self.name, error = %rollback, "rollback failed");
      }
      return Err(err.into());
    }
    self.reader.reload()?;
    Ok(())
  }

  fn upsert(&self, id: &str, source: &Value, must_exist: bool) -> Result<()> {
    let mut writer = self.writer.blocking_lock();
    let seq = match self.find(id)? {
      Some(existing) => existing.seq,
      None if must_exist => {
        return Err(Error::DocumentMissing { index: self.name.clone(), id: id.to_owned() });
      }
      None => {
        writer.next_seq += 1;
        writer.next_seq - 1
      }
    };

    let mut doc = TantivyDocument::default();
    doc.add_text(self.fields.id, id);
    doc.add_u64(self.fields.seq, seq);
    doc.add_text(self.fields.source, serde_json::to_string(source)?);
    for (path, field) in &self.fields.filters {
      if let Some(value) = lookup(source, path) {
        doc.add_text(*field, value);
      }
    }

    self.apply(&mut writer, |inner| {
      inner.delete_term(self.id_term(id));
      inner.add_document(doc).map(|_| ())
    })
  }

  fn delete(&self, id: &str) -> Result<bool> {
    let mut writer = self.writer.blocking_lock();
    if self.find(id)?.is_none() {
      return Ok(false);
    }
    self.apply(&mut writer, |inner| {
      inner.delete_term(self.id_term(id));
      Ok(())
    })?;
    Ok(true)
  }

  fn search(&self, query: &Query, page: Page) -> Result<Vec<Hit>> {
    let searcher = self.reader.searcher();
    let mut matched = match query {
      Query::MatchAll => self.matching(&searcher, &AllQuery)?,
      Query::Term { field, value } => {
        let term_field = self.fields.filter(field).ok_or_else(|| Error::NotFilterable {
          index: self.name.clone(),
          field: field.clone(),
        })?;
        let query = TermQuery::new(
          Term::from_field_text(term_field, value),
          IndexRecordOption::Basic,
        );
        self.matching(&searcher, &query)?
      }
    };
    matched.sort_by_key(|stored| stored.seq);
    Ok(page.apply(
      matched
        .into_iter()
        .map(|stored| Hit { id: stored.id, source: stored.source }),
    ))
  }
}

// ─── Indices ─────────────────────────────────────────────────────────────────

/// Shared handle to a set of named indices. Cloning is cheap; all clones see
/// the same documents.
#[derive(Clone)]
pub struct Indices {
  root:  Option<PathBuf>,
  inner: Arc<RwLock<HashMap<String, Arc<DocIndex>>>>,
}

impl Indices {
  /// Indices kept on disk, one directory per index under `root`.
  pub fn open(root: impl Into<PathBuf>) -> Self { Self::with_root(Some(root.into())) }

  /// Indices that live only as long as this handle and its clones.
  pub fn in_memory() -> Self { Self::with_root(None) }

  fn with_root(root: Option<PathBuf>) -> Self {
    Self { root, inner: Arc::new(RwLock::new(HashMap::new())) }
  }

  /// Open `name`, creating it if it does not exist yet. `filterable` names
  /// the dotted source paths that [`Query::Term`] may search on. Returns
  /// `true` if a new index was created, `false` if it was already open or
  /// already on disk.
  pub async fn create_index(&self, name: &str, filterable: &[&str]) -> Result<bool> {
    let mut indices = self.inner.write().await;
    if indices.contains_key(name) {
      return Ok(false);
    }
    let dir = self.root.as_ref().map(|root| root.join(name));
    let owned = name.to_owned();
    let filterable: Vec<String> = filterable.iter().map(|f| (*f).to_owned()).collect();
    let (index, created) =
      tokio::task::spawn_blocking(move || DocIndex::open(&owned, dir, &filterable)).await??;
    indices.insert(name.to_owned(), Arc::new(index));
    Ok(created)
  }

  pub async fn index_exists(&self, name: &str) -> bool {
    self.inner.read().await.contains_key(name)
  }

  async fn run<T, F>(&self, name: &str, op: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&DocIndex) -> Result<T> + Send + 'static,
  {
    let index = self
      .inner
      .read()
      .await
      .get(name)
      .cloned()
      .ok_or_else(|| Error::IndexMissing(name.to_owned()))?;
    tokio::task::spawn_blocking(move || op(&index)).await?
  }

  /// Index `source` under `id`, replacing any document already there. A
  /// replaced document keeps its original position in search results.
  pub async fn put(&self, index: &str, id: &str, source: Value) -> Result<()> {
    let id = id.to_owned();
    self.run(index, move |idx| idx.upsert(&id, &source, false)).await
  }

  /// Replace the document under `id`; fails if there is none.
  pub async fn update(&self, index: &str, id: &str, source: Value) -> Result<()> {
    let id = id.to_owned();
    self.run(index, move |idx| idx.upsert(&id, &source, true)).await
  }

  pub async fn get(&self, index: &str, id: &str) -> Result<Option<Value>> {
    let id = id.to_owned();
    self
      .run(index, move |idx| Ok(idx.find(&id)?.map(|stored| stored.source)))
      .await
  }

  /// Returns `true` if a document was removed.
  pub async fn delete(&self, index: &str, id: &str) -> Result<bool> {
    let id = id.to_owned();
    self.run(index, move |idx| idx.delete(&id)).await
  }

  pub async fn search(&self, index: &str, query: &Query, page: Page) -> Result<Vec<Hit>> {
    let query = query.clone();
    self.run(index, move |idx| idx.search(&query, page)).await
  }
}
