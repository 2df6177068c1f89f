use std::sync::Arc;

use pxinstr::{entry::CompiledExpression, op::ExpOp, record::Record};

use crate::{
    coercion::{GeoJsonDump, NoSerializer, Serializer, TextGeoJson, ValueCoercion},
    config::CompilerConfig,
    emitter::OpcodeEmitter,
    ext::pxlog::Logger,
    pxdebug, pxinfo, pxwarn,
    queue::PredicateQueue,
    utils::error::{CompileError, CompileResult},
};

/// Compiles host record sequences into flat expressions.
///
/// A compiler holds no per-call state and can be shared between threads.
#[derive(Clone)]
pub struct Compiler {
    config: CompilerConfig,
    serializer: Arc<dyn Serializer>,
    geojson: Arc<dyn GeoJsonDump>,
    logger: Logger,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            serializer: Arc::new(NoSerializer),
            geojson: Arc::new(TextGeoJson),
            logger: Logger::new(),
        }
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn with_geojson(mut self, geojson: Arc<dyn GeoJsonDump>) -> Self {
        self.geojson = geojson;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `records`, given in prefix order, into one expression.
    ///
    /// The first failure aborts the call; no partial expression is returned.
    /// Byte buffers shared by [`pxinstr::value::HostValue::Bytes`] are
    /// referenced, not copied, by the result.
    pub fn compile(&self, records: &[Record]) -> CompileResult<CompiledExpression> {
        self.compile_records(records).inspect_err(|e| {
            pxwarn!(self.logger, "compilation failed ({}): {}", e.kind(), e);
        })
    }

    fn compile_records(&self, records: &[Record]) -> CompileResult<CompiledExpression> {
        if records.is_empty() {
            pxdebug!(self.logger, "empty input, nothing to compile");
            return Ok(CompiledExpression::default());
        }

        let bound = self.config.entries_per_node;
        let coercion = ValueCoercion::new(self.serializer.as_ref(), self.geojson.as_ref());

        // Room for every record plus one terminator per variadic operator.
        let variadic = records
            .iter()
            .filter(|r| ExpOp::from_code(r.op).is_some_and(ExpOp::is_variadic))
            .count();
        let capacity = (records.len() + variadic).saturating_mul(bound);
        let mut scratch = Vec::new();
        scratch.try_reserve_exact(capacity)?;

        let queue = PredicateQueue::build(records, &coercion, &self.logger, self.config.strict_arity)?;
        let emitter = OpcodeEmitter::new(bound);

        let mut cursor = 0;
        for node in queue.nodes() {
            let run = emitter.emit(node, &mut scratch)?;

            if self.config.strict_arity && run.operands as i64 != node.declared_children {
                return Err(CompileError::ArityMismatch {
                    op: node.name(),
                    index: node.source.unwrap_or_default(),
                    expected: run.operands,
                    declared: node.declared_children,
                });
            }

            cursor += run.written;
        }
        scratch.truncate(cursor);

        pxinfo!(
            self.logger,
            "compiled {} record(s) into {} node(s) and {} entries",
            records.len(),
            queue.len(),
            cursor
        );
        Ok(CompiledExpression::from(scratch))
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerConfig::default())
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("config", &self.config)
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}
