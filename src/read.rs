//!
//! # Tech21 Reading & Decoding
//!
//! Parsing of the textual (proto-text) encoding, via the [TechLexer] and
//! [TechParser] pair, and decoding of the binary (proto-wire) encoding via
//! [TechDecoder]. JSON decoding is handled by [serde_json] from [crate::ser].
//!
//! Both decoders report failure through [TechError] rather than returning a
//! partially populated tree; a successful return means the input conformed
//! to the schema.
//!

// Std-Lib Imports
use std::io::Read;
use std::path::Path;
use std::str::Chars;

// Crates.io Imports
use byteorder::{ByteOrder, LittleEndian};

// Local Imports
use crate::data::*;
use crate::write::{WIRE_I64, WIRE_LEN, WIRE_VARINT};

/// Parse textual-format content from file `fname`
pub fn parse_file(fname: impl AsRef<Path>) -> TechResult<Technology> {
    let mut file = std::fs::File::open(fname)?;
    let mut src = String::new();
    file.read_to_string(&mut src)?;
    parse_str(&src)
}
/// Parse textual-format content `src` from string
pub fn parse_str(src: &str) -> TechResult<Technology> {
    let mut parser = TechParser::new(src)?;
    parser.parse_technology()
}

/// Token type-annotations for the textual format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
    Ident,
    Number,
    StrLit,
    OpenBrace,
    CloseBrace,
    Colon,
}
/// A lexed token: source-span plus type annotation
#[derive(Clone, Copy, Debug)]
pub struct Token {
    /// Start byte index
    pub start: usize,
    /// End byte index
    pub stop: usize,
    /// Line number, one-based
    pub line: usize,
    /// Token Type
    pub ttype: TokenType,
}
impl Token {
    /// Retrieve this token's text content from source-string `src`
    pub fn substr<'src>(&self, src: &'src str) -> &'src str {
        &src[self.start..self.stop]
    }
}

/// # Tech Textual-Format Lexer
///
/// Breaks the input string into an iteration of [Token]s.
/// Whitespace and `#`-to-end-of-line comments are consumed and not emitted,
/// which is also what makes the two file-header comment lines inert.
pub struct TechLexer<'src> {
    /// Source-string character iterator
    chars: Chars<'src>,
    /// Peekable next character
    next_char: Option<char>,
    /// Active lexeme start byte-index
    start: usize,
    /// Active byte index
    pos: usize,
    /// Active line number
    line: usize,
}
impl<'src> TechLexer<'src> {
    pub fn new(src: &'src str) -> Self {
        let mut chars = src.chars();
        let next_char = chars.next();
        Self {
            chars,
            next_char,
            start: 0,
            pos: 0,
            line: 1,
        }
    }
    /// Get and return our next character, updating our position along the way.
    /// Positions are byte offsets into the source string, so token spans
    /// remain sliceable in the presence of multi-byte characters.
    fn next_char(&mut self) -> Option<char> {
        if self.next_char.is_none() {
            return None;
        }
        let mut rv = self.chars.next();
        std::mem::swap(&mut rv, &mut self.next_char);
        if let Some(c) = rv {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
            }
        }
        rv
    }
    /// Peek at our next character, without advancing
    fn peek_char(&self) -> &Option<char> {
        &self.next_char
    }
    /// Accept a character if it meets predicate-function `f`
    fn accept(&mut self, f: impl Fn(char) -> bool) -> bool {
        match self.peek_char() {
            Some(ref ch) if f(*ch) => {
                self.next_char();
                true
            }
            _ => false,
        }
    }
    /// Accept a single-character match
    fn accept_char(&mut self, c: char) -> bool {
        self.accept(|a| a == c)
    }
    /// Emit a [Token] of [TokenType] `ttype` spanning the active lexeme
    fn emit(&mut self, ttype: TokenType) -> Token {
        let tok = Token {
            start: self.start,
            stop: self.pos,
            line: self.line,
            ttype,
        };
        self.start = self.pos;
        tok
    }
    /// Ignore the active lexeme, bumping our start-index to the current index
    fn ignore(&mut self) {
        self.start = self.pos;
    }
    /// Lex and return our next [Token]. Returns `None` at end-of-input.
    pub fn next_token(&mut self) -> TechResult<Option<Token>> {
        loop {
            if self.peek_char().is_none() {
                return Ok(None);
            }
            if self.accept(|c| c.is_whitespace()) {
                self.ignore();
            } else if self.accept_char('#') {
                // Comment. Consume to end-of-line.
                while self.accept(|c| c != '\n') {}
                self.ignore();
            } else if self.accept_char('{') {
                return Ok(Some(self.emit(TokenType::OpenBrace)));
            } else if self.accept_char('}') {
                return Ok(Some(self.emit(TokenType::CloseBrace)));
            } else if self.accept_char(':') {
                return Ok(Some(self.emit(TokenType::Colon)));
            } else if self.accept_char('"') {
                return self.lex_string();
            } else if self.accept(|c| c.is_ascii_digit() || c == '-' || c == '+') {
                return self.lex_number();
            } else if self.accept(|c| c.is_ascii_alphabetic() || c == '_') {
                return self.lex_ident();
            } else {
                let (line, next_char) = (self.line, *self.peek_char());
                return Err(TechError::Parse {
                    msg: format!("Invalid character {:?}", next_char),
                    line,
                });
            }
        }
    }
    /// Lex a quoted string literal. The leading quote has been consumed.
    /// The token span includes both quotes; escapes are resolved at parse time.
    fn lex_string(&mut self) -> TechResult<Option<Token>> {
        loop {
            match self.next_char() {
                Some('\\') => {
                    // Escaped character; consume whatever follows
                    self.next_char();
                }
                Some('"') => return Ok(Some(self.emit(TokenType::StrLit))),
                Some(_) => continue,
                None => {
                    return Err(TechError::Parse {
                        msg: "Unterminated string literal".to_string(),
                        line: self.line,
                    })
                }
            }
        }
    }
    /// Lex a (possibly signed, possibly fractional) number
    fn lex_number(&mut self) -> TechResult<Option<Token>> {
        while self.accept(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '-' || c == '+')
        {
        }
        Ok(Some(self.emit(TokenType::Number)))
    }
    /// Lex an identifier, e.g. a field name or enum value
    fn lex_ident(&mut self) -> TechResult<Option<Token>> {
        while self.accept(|c| c.is_ascii_alphanumeric() || c == '_') {}
        Ok(Some(self.emit(TokenType::Ident)))
    }
    /// Lex all remaining [Token]s, returning them as a [Vec]
    pub fn lex_all(&mut self) -> TechResult<Vec<Token>> {
        let mut toks = Vec::new();
        while let Some(tok) = self.next_token()? {
            toks.push(tok);
        }
        Ok(toks)
    }
}

/// # Tech Textual-Format Parser
///
/// Recursive-descent over the schema's message tree. Fields may arrive in
/// any order; repeated fields accumulate. Unknown field names are schema
/// mismatches and fail the parse.
pub struct TechParser<'src> {
    /// Source string
    src: &'src str,
    /// Lexer
    lex: TechLexer<'src>,
    /// Peekable next token
    next_tok: Option<Token>,
}
impl<'src> TechParser<'src> {
    pub fn new(src: &'src str) -> TechResult<Self> {
        let mut lex = TechLexer::new(src);
        let next_tok = lex.next_token()?;
        Ok(Self { src, lex, next_tok })
    }
    /// Advance to and return our next [Token]
    fn next(&mut self) -> TechResult<Option<Token>> {
        let mut tok = self.lex.next_token()?;
        std::mem::swap(&mut tok, &mut self.next_tok);
        Ok(tok)
    }
    /// Peek at our next [Token] without advancing
    fn peek(&self) -> &Option<Token> {
        &self.next_tok
    }
    /// Fail with a [TechError::Parse] at the current source-location
    fn err<T>(&self, msg: impl Into<String>) -> TechResult<T> {
        let line = match self.peek() {
            Some(tok) => tok.line,
            None => self.lex.line,
        };
        Err(TechError::Parse {
            msg: msg.into(),
            line,
        })
    }
    /// Advance past our next [Token], failing if it is not of type `ttype`
    fn expect(&mut self, ttype: TokenType) -> TechResult<Token> {
        match self.next()? {
            Some(tok) if tok.ttype == ttype => Ok(tok),
            Some(tok) => self.err(format!(
                "Expected {:?}, found {:?} '{}'",
                ttype,
                tok.ttype,
                tok.substr(self.src)
            )),
            None => self.err(format!("Expected {:?}, found end-of-input", ttype)),
        }
    }
    /// Parse a field name
    fn field_name(&mut self) -> TechResult<&'src str> {
        let tok = self.expect(TokenType::Ident)?;
        Ok(tok.substr(self.src))
    }
    /// Parse a `: "quoted string"` scalar, resolving escapes
    fn string_value(&mut self) -> TechResult<String> {
        self.expect(TokenType::Colon)?;
        let tok = self.expect(TokenType::StrLit)?;
        let quoted = tok.substr(self.src);
        unescape(&quoted[1..quoted.len() - 1]).ok_or_else(|| TechError::Parse {
            msg: format!("Invalid string escape in {}", quoted),
            line: tok.line,
        })
    }
    /// Parse a `: number` scalar as a double
    fn f64_value(&mut self) -> TechResult<f64> {
        self.expect(TokenType::Colon)?;
        let tok = self.expect(TokenType::Number)?;
        let txt = tok.substr(self.src);
        txt.parse::<f64>().map_err(|_| TechError::Parse {
            msg: format!("Invalid number '{}'", txt),
            line: tok.line,
        })
    }
    /// Parse a `: number` scalar as an unsigned integer
    fn u32_value(&mut self) -> TechResult<u32> {
        self.expect(TokenType::Colon)?;
        let tok = self.expect(TokenType::Number)?;
        let txt = tok.substr(self.src);
        txt.parse::<u32>().map_err(|_| TechError::Parse {
            msg: format!("Invalid unsigned integer '{}'", txt),
            line: tok.line,
        })
    }
    /// Parse a `: ENUM_NAME` scalar, returning the bare name
    fn enum_value(&mut self) -> TechResult<&'src str> {
        self.expect(TokenType::Colon)?;
        let tok = self.expect(TokenType::Ident)?;
        Ok(tok.substr(self.src))
    }
    /// Open a `{`-delimited sub-message
    fn begin_msg(&mut self) -> TechResult<()> {
        self.expect(TokenType::OpenBrace)?;
        Ok(())
    }
    /// True if the next token closes the active sub-message,
    /// consuming the closing brace when it does
    fn at_msg_end(&mut self) -> TechResult<bool> {
        match self.peek() {
            Some(tok) if tok.ttype == TokenType::CloseBrace => {
                self.next()?;
                Ok(true)
            }
            None => self.err("Unexpected end-of-input inside message"),
            _ => Ok(false),
        }
    }
    /// Parse a root [Technology] message: fields to end-of-input
    pub fn parse_technology(&mut self) -> TechResult<Technology> {
        let mut tech = Technology::default();
        while self.peek().is_some() {
            match self.field_name()? {
                "name" => tech.name = self.string_value()?,
                "layers" => {
                    self.begin_msg()?;
                    tech.layers.push(self.parse_layer_info()?);
                }
                "lvs_computed_layers" => {
                    self.begin_msg()?;
                    tech.lvs_computed_layers.push(self.parse_computed_layer()?);
                }
                "process_stack" => {
                    self.begin_msg()?;
                    while !self.at_msg_end()? {
                        match self.field_name()? {
                            "layers" => {
                                self.begin_msg()?;
                                let layer = self.parse_stack_layer()?;
                                tech.process_stack.layers.push(layer);
                            }
                            other => {
                                return self
                                    .err(format!("Unknown ProcessStackInfo field '{}'", other))
                            }
                        }
                    }
                }
                "extraction" => {
                    self.begin_msg()?;
                    tech.extraction = self.parse_extraction()?;
                }
                other => return self.err(format!("Unknown Technology field '{}'", other)),
            }
        }
        Ok(tech)
    }
    /// Parse a [LayerInfo] sub-message body
    fn parse_layer_info(&mut self) -> TechResult<LayerInfo> {
        let mut layer = LayerInfo::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "name" => layer.name = self.string_value()?,
                "description" => layer.description = self.string_value()?,
                "gds_layer" => layer.gds_layer = self.u32_value()?,
                "gds_datatype" => layer.gds_datatype = self.u32_value()?,
                other => return self.err(format!("Unknown LayerInfo field '{}'", other)),
            }
        }
        Ok(layer)
    }
    /// Parse a [ComputedLayerInfo] sub-message body
    fn parse_computed_layer(&mut self) -> TechResult<ComputedLayerInfo> {
        let mut kind: Option<ComputedLayerKind> = None;
        let mut layer_info: Option<LayerInfo> = None;
        while !self.at_msg_end()? {
            match self.field_name()? {
                "kind" => {
                    let name = self.enum_value()?;
                    match ComputedLayerKind::from_str_name(name) {
                        Some(k) => kind = Some(k),
                        None => {
                            return self.err(format!("Invalid ComputedLayerInfo.Kind '{}'", name))
                        }
                    }
                }
                "layer_info" => {
                    self.begin_msg()?;
                    layer_info = Some(self.parse_layer_info()?);
                }
                other => return self.err(format!("Unknown ComputedLayerInfo field '{}'", other)),
            }
        }
        match (kind, layer_info) {
            (Some(kind), Some(layer_info)) => Ok(ComputedLayerInfo { kind, layer_info }),
            (None, _) => self.err("ComputedLayerInfo missing 'kind'"),
            (_, None) => self.err("ComputedLayerInfo missing 'layer_info'"),
        }
    }
    /// Parse a [StackLayer] sub-message body: name, type tag, and exactly one
    /// type-specific parameter record. A declared `layer_type` inconsistent
    /// with the parameter record is a schema mismatch.
    fn parse_stack_layer(&mut self) -> TechResult<StackLayer> {
        let mut name = String::new();
        let mut declared: Option<LayerType> = None;
        let mut params: Option<StackLayerParams> = None;
        while !self.at_msg_end()? {
            let field = self.field_name()?;
            match field {
                "name" => {
                    name = self.string_value()?;
                    continue;
                }
                "layer_type" => {
                    let txt = self.enum_value()?;
                    match LayerType::from_str_name(txt) {
                        Some(t) => declared = Some(t),
                        None => return self.err(format!("Invalid LayerType '{}'", txt)),
                    }
                    continue;
                }
                _ => (),
            }
            if params.is_some() {
                return self.err(format!(
                    "Duplicate stack-layer parameter record '{}'",
                    field
                ));
            }
            self.begin_msg()?;
            params = Some(match field {
                "substrate_layer" => self.parse_substrate_layer()?.into(),
                "nwell_layer" => self.parse_nwell_layer()?.into(),
                "diffusion_layer" => self.parse_diffusion_layer()?.into(),
                "field_oxide_layer" => self.parse_field_oxide_layer()?.into(),
                "metal_layer" => self.parse_metal_layer()?.into(),
                "simple_dielectric_layer" => self.parse_simple_dielectric_layer()?.into(),
                "conformal_dielectric_layer" => self.parse_conformal_dielectric_layer()?.into(),
                "sidewall_dielectric_layer" => self.parse_sidewall_dielectric_layer()?.into(),
                other => return self.err(format!("Unknown stack-layer field '{}'", other)),
            });
        }
        let params = match params {
            Some(p) => p,
            None => return self.err("Stack layer missing its parameter record"),
        };
        if let Some(declared) = declared {
            if declared != params.layer_type() {
                return self.err(format!(
                    "layer_type {} does not match parameter record {}",
                    declared.as_str(),
                    params.layer_type().as_str()
                ));
            }
        }
        Ok(StackLayer { name, params })
    }
    fn parse_substrate_layer(&mut self) -> TechResult<SubstrateLayer> {
        let mut layer = SubstrateLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "height" => layer.height = self.f64_value()?,
                "thickness" => layer.thickness = self.f64_value()?,
                "reference" => layer.reference = self.string_value()?,
                other => return self.err(format!("Unknown SubstrateLayer field '{}'", other)),
            }
        }
        Ok(layer)
    }
    fn parse_nwell_layer(&mut self) -> TechResult<NWellLayer> {
        let mut layer = NWellLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "height" => layer.height = self.f64_value()?,
                "reference" => layer.reference = self.string_value()?,
                "contact_above" => {
                    self.begin_msg()?;
                    layer.contact_above = Some(self.parse_contact()?);
                }
                other => return self.err(format!("Unknown NWellLayer field '{}'", other)),
            }
        }
        Ok(layer)
    }
    fn parse_diffusion_layer(&mut self) -> TechResult<DiffusionLayer> {
        let mut layer = DiffusionLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "height" => layer.height = self.f64_value()?,
                "reference" => layer.reference = self.string_value()?,
                "contact_above" => {
                    self.begin_msg()?;
                    layer.contact_above = Some(self.parse_contact()?);
                }
                other => return self.err(format!("Unknown DiffusionLayer field '{}'", other)),
            }
        }
        Ok(layer)
    }
    fn parse_field_oxide_layer(&mut self) -> TechResult<FieldOxideLayer> {
        let mut layer = FieldOxideLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "dielectric_k" => layer.dielectric_k = self.f64_value()?,
                other => return self.err(format!("Unknown FieldOxideLayer field '{}'", other)),
            }
        }
        Ok(layer)
    }
    fn parse_metal_layer(&mut self) -> TechResult<MetalLayer> {
        let mut layer = MetalLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "height" => layer.height = self.f64_value()?,
                "thickness" => layer.thickness = self.f64_value()?,
                "reference_below" => layer.reference_below = self.string_value()?,
                "reference_above" => layer.reference_above = self.string_value()?,
                "contact_above" => {
                    self.begin_msg()?;
                    layer.contact_above = Some(self.parse_contact()?);
                }
                other => return self.err(format!("Unknown MetalLayer field '{}'", other)),
            }
        }
        Ok(layer)
    }
    fn parse_simple_dielectric_layer(&mut self) -> TechResult<SimpleDielectricLayer> {
        let mut layer = SimpleDielectricLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "dielectric_k" => layer.dielectric_k = self.f64_value()?,
                "reference" => layer.reference = self.string_value()?,
                other => {
                    return self.err(format!("Unknown SimpleDielectricLayer field '{}'", other))
                }
            }
        }
        Ok(layer)
    }
    fn parse_conformal_dielectric_layer(&mut self) -> TechResult<ConformalDielectricLayer> {
        let mut layer = ConformalDielectricLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "dielectric_k" => layer.dielectric_k = self.f64_value()?,
                "thickness_over_metal" => layer.thickness_over_metal = self.f64_value()?,
                "thickness_where_no_metal" => layer.thickness_where_no_metal = self.f64_value()?,
                "thickness_sidewall" => layer.thickness_sidewall = self.f64_value()?,
                "reference" => layer.reference = self.string_value()?,
                other => {
                    return self.err(format!("Unknown ConformalDielectricLayer field '{}'", other))
                }
            }
        }
        Ok(layer)
    }
    fn parse_sidewall_dielectric_layer(&mut self) -> TechResult<SidewallDielectricLayer> {
        let mut layer = SidewallDielectricLayer::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "dielectric_k" => layer.dielectric_k = self.f64_value()?,
                "height_above_metal" => layer.height_above_metal = self.f64_value()?,
                "width_outside_sidewall" => layer.width_outside_sidewall = self.f64_value()?,
                "reference" => layer.reference = self.string_value()?,
                other => {
                    return self.err(format!("Unknown SidewallDielectricLayer field '{}'", other))
                }
            }
        }
        Ok(layer)
    }
    fn parse_contact(&mut self) -> TechResult<Contact> {
        let mut contact = Contact::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "name" => contact.name = self.string_value()?,
                "metal_above" => contact.metal_above = self.string_value()?,
                "thickness" => contact.thickness = self.f64_value()?,
                other => return self.err(format!("Unknown Contact field '{}'", other)),
            }
        }
        Ok(contact)
    }
    /// Parse an [ExtractionInfo] sub-message body
    fn parse_extraction(&mut self) -> TechResult<ExtractionInfo> {
        let mut ex = ExtractionInfo::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "side_halo" => ex.side_halo = self.f64_value()?,
                "fringe_shield_halo" => ex.fringe_shield_halo = self.f64_value()?,
                "resistance" => {
                    self.begin_msg()?;
                    while !self.at_msg_end()? {
                        match self.field_name()? {
                            "layers" => {
                                self.begin_msg()?;
                                ex.resistance.layers.push(self.parse_layer_resistance()?);
                            }
                            "vias" => {
                                self.begin_msg()?;
                                ex.resistance.vias.push(self.parse_via_resistance()?);
                            }
                            other => {
                                return self.err(format!("Unknown ResistanceInfo field '{}'", other))
                            }
                        }
                    }
                }
                "capacitance" => {
                    self.begin_msg()?;
                    while !self.at_msg_end()? {
                        match self.field_name()? {
                            "substrates" => {
                                self.begin_msg()?;
                                ex.capacitance
                                    .substrates
                                    .push(self.parse_substrate_capacitance()?);
                            }
                            "overlaps" => {
                                self.begin_msg()?;
                                ex.capacitance
                                    .overlaps
                                    .push(self.parse_overlap_capacitance()?);
                            }
                            "sidewalls" => {
                                self.begin_msg()?;
                                ex.capacitance
                                    .sidewalls
                                    .push(self.parse_sidewall_capacitance()?);
                            }
                            "sideoverlaps" => {
                                self.begin_msg()?;
                                ex.capacitance
                                    .sideoverlaps
                                    .push(self.parse_sideoverlap_capacitance()?);
                            }
                            other => {
                                return self
                                    .err(format!("Unknown CapacitanceInfo field '{}'", other))
                            }
                        }
                    }
                }
                other => return self.err(format!("Unknown ExtractionInfo field '{}'", other)),
            }
        }
        Ok(ex)
    }
    fn parse_layer_resistance(&mut self) -> TechResult<LayerResistance> {
        let mut lr = LayerResistance::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "layer_name" => lr.layer_name = self.string_value()?,
                "resistance" => lr.resistance = self.f64_value()?,
                "corner_adjustment_fraction" => {
                    lr.corner_adjustment_fraction = Some(self.f64_value()?)
                }
                other => return self.err(format!("Unknown LayerResistance field '{}'", other)),
            }
        }
        Ok(lr)
    }
    fn parse_via_resistance(&mut self) -> TechResult<ViaResistance> {
        let mut vr = ViaResistance::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "via_name" => vr.via_name = self.string_value()?,
                "resistance" => vr.resistance = self.f64_value()?,
                other => return self.err(format!("Unknown ViaResistance field '{}'", other)),
            }
        }
        Ok(vr)
    }
    fn parse_substrate_capacitance(&mut self) -> TechResult<SubstrateCapacitance> {
        let mut sc = SubstrateCapacitance::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "layer_name" => sc.layer_name = self.string_value()?,
                "area_capacitance" => sc.area_capacitance = self.f64_value()?,
                "perimeter_capacitance" => sc.perimeter_capacitance = self.f64_value()?,
                other => {
                    return self.err(format!("Unknown SubstrateCapacitance field '{}'", other))
                }
            }
        }
        Ok(sc)
    }
    fn parse_overlap_capacitance(&mut self) -> TechResult<OverlapCapacitance> {
        let mut oc = OverlapCapacitance::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "top_layer_name" => oc.top_layer_name = self.string_value()?,
                "bottom_layer_name" => oc.bottom_layer_name = self.string_value()?,
                "capacitance" => oc.capacitance = self.f64_value()?,
                other => return self.err(format!("Unknown OverlapCapacitance field '{}'", other)),
            }
        }
        Ok(oc)
    }
    fn parse_sidewall_capacitance(&mut self) -> TechResult<SidewallCapacitance> {
        let mut swc = SidewallCapacitance::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "layer_name" => swc.layer_name = self.string_value()?,
                "capacitance" => swc.capacitance = self.f64_value()?,
                "offset" => swc.offset = self.f64_value()?,
                other => return self.err(format!("Unknown SidewallCapacitance field '{}'", other)),
            }
        }
        Ok(swc)
    }
    fn parse_sideoverlap_capacitance(&mut self) -> TechResult<SideOverlapCapacitance> {
        let mut soc = SideOverlapCapacitance::default();
        while !self.at_msg_end()? {
            match self.field_name()? {
                "in_layer_name" => soc.in_layer_name = self.string_value()?,
                "out_layer_name" => soc.out_layer_name = self.string_value()?,
                "capacitance" => soc.capacitance = self.f64_value()?,
                other => {
                    return self.err(format!("Unknown SideOverlapCapacitance field '{}'", other))
                }
            }
        }
        Ok(soc)
    }
}

/// Resolve backslash-escapes in string-literal content.
/// Returns `None` on an invalid escape.
fn unescape(s: &str) -> Option<String> {
    let mut rv = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            rv.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => rv.push('\\'),
            Some('"') => rv.push('"'),
            Some('n') => rv.push('\n'),
            Some('t') => rv.push('\t'),
            Some('r') => rv.push('\r'),
            _ => return None,
        }
    }
    Some(rv)
}

/// Decode a [Technology] from binary-format file `fname`
pub fn load_binary(fname: impl AsRef<Path>) -> TechResult<Technology> {
    let mut file = std::fs::File::open(fname)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    from_bytes(&buf)
}
/// Decode a [Technology] from protobuf-binary bytes
pub fn from_bytes(bytes: &[u8]) -> TechResult<Technology> {
    let mut dec = TechDecoder::new(bytes);
    let end = bytes.len();
    dec.technology(end)
}

/// # Tech Binary-Format Decoder
///
/// Walks a byte-slice of protobuf wire data, dispatching on field tags per
/// message. Unknown fields are skipped (the wire format's native
/// forward-tolerance); anything structurally malformed, and any enumeration
/// value outside its closed set, fails with [TechError::Decode].
pub struct TechDecoder<'b> {
    buf: &'b [u8],
    pos: usize,
}
impl<'b> TechDecoder<'b> {
    pub fn new(buf: &'b [u8]) -> Self {
        Self { buf, pos: 0 }
    }
    /// Fail with a [TechError::Decode] at the current position
    fn err<T>(&self, msg: impl Into<String>) -> TechResult<T> {
        Err(TechError::Decode {
            msg: msg.into(),
            pos: self.pos,
        })
    }
    /// Read a base-128 varint
    fn varint(&mut self) -> TechResult<u64> {
        let mut rv: u64 = 0;
        let mut shift = 0;
        loop {
            if self.pos >= self.buf.len() {
                return self.err("Truncated varint");
            }
            if shift >= 64 {
                return self.err("Varint overflow");
            }
            let byte = self.buf[self.pos];
            self.pos += 1;
            rv |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(rv);
            }
            shift += 7;
        }
    }
    /// Read a field key, returning its (tag, wire-type) pair
    fn field_key(&mut self) -> TechResult<(u32, u8)> {
        let key = self.varint()?;
        Ok(((key >> 3) as u32, (key & 0x7) as u8))
    }
    /// Read a little-endian 64-bit double
    fn f64(&mut self, wire: u8) -> TechResult<f64> {
        if wire != WIRE_I64 {
            return self.err(format!("Expected 64-bit field, got wire type {}", wire));
        }
        if self.pos + 8 > self.buf.len() {
            return self.err("Truncated double");
        }
        let rv = LittleEndian::read_f64(&self.buf[self.pos..self.pos + 8]);
        self.pos += 8;
        Ok(rv)
    }
    /// Read a varint-encoded uint32
    fn u32(&mut self, wire: u8) -> TechResult<u32> {
        if wire != WIRE_VARINT {
            return self.err(format!("Expected varint field, got wire type {}", wire));
        }
        let v = self.varint()?;
        u32::try_from(v).or_else(|_| self.err(format!("uint32 out of range: {}", v)))
    }
    /// Read a varint-encoded enumeration value
    fn enum_i32(&mut self, wire: u8) -> TechResult<i32> {
        if wire != WIRE_VARINT {
            return self.err(format!("Expected varint field, got wire type {}", wire));
        }
        let v = self.varint()?;
        i32::try_from(v).or_else(|_| self.err(format!("Enum value out of range: {}", v)))
    }
    /// Read a length-delimited field's length, bounds-checked
    fn len_delimited(&mut self, wire: u8) -> TechResult<usize> {
        if wire != WIRE_LEN {
            return self.err(format!(
                "Expected length-delimited field, got wire type {}",
                wire
            ));
        }
        let len = self.varint()?;
        // Compared in u64 so a hostile declared length cannot wrap the sum
        if len > (self.buf.len() - self.pos) as u64 {
            return self.err("Truncated length-delimited field");
        }
        Ok(len as usize)
    }
    /// Read a length-delimited string field
    fn string(&mut self, wire: u8) -> TechResult<String> {
        let len = self.len_delimited(wire)?;
        let bytes = &self.buf[self.pos..self.pos + len];
        let rv = std::str::from_utf8(bytes)?.to_string();
        self.pos += len;
        Ok(rv)
    }
    /// Read a sub-message's length, returning its end position
    fn msg_end(&mut self, wire: u8) -> TechResult<usize> {
        let len = self.len_delimited(wire)?;
        Ok(self.pos + len)
    }
    /// Skip a field of wire-type `wire`
    fn skip(&mut self, wire: u8) -> TechResult<()> {
        match wire {
            WIRE_VARINT => {
                self.varint()?;
            }
            WIRE_I64 => {
                if self.pos + 8 > self.buf.len() {
                    return self.err("Truncated 64-bit field");
                }
                self.pos += 8;
            }
            WIRE_LEN => {
                let len = self.len_delimited(wire)?;
                self.pos += len;
            }
            5 => {
                // 32-bit fields never occur in this schema, but are skippable
                if self.pos + 4 > self.buf.len() {
                    return self.err("Truncated 32-bit field");
                }
                self.pos += 4;
            }
            _ => return self.err(format!("Invalid wire type {}", wire)),
        }
        Ok(())
    }
    /// Decode a [Technology] spanning up to byte-position `end`
    fn technology(&mut self, end: usize) -> TechResult<Technology> {
        let mut tech = Technology::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => tech.name = self.string(wire)?,
                2 => {
                    let end = self.msg_end(wire)?;
                    tech.layers.push(self.layer_info(end)?);
                }
                3 => {
                    let end = self.msg_end(wire)?;
                    tech.lvs_computed_layers.push(self.computed_layer(end)?);
                }
                4 => {
                    let end = self.msg_end(wire)?;
                    tech.process_stack = self.process_stack(end)?;
                }
                5 => {
                    let end = self.msg_end(wire)?;
                    tech.extraction = self.extraction(end)?;
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(tech)
    }
    fn layer_info(&mut self, end: usize) -> TechResult<LayerInfo> {
        let mut layer = LayerInfo::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.name = self.string(wire)?,
                2 => layer.description = self.string(wire)?,
                3 => layer.gds_layer = self.u32(wire)?,
                4 => layer.gds_datatype = self.u32(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn computed_layer(&mut self, end: usize) -> TechResult<ComputedLayerInfo> {
        let mut kind: Option<ComputedLayerKind> = None;
        let mut layer_info = LayerInfo::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => {
                    let v = self.enum_i32(wire)?;
                    kind = match ComputedLayerKind::from_i32(v) {
                        Some(k) => Some(k),
                        None => return self.err(format!("Invalid ComputedLayerInfo.Kind {}", v)),
                    };
                }
                2 => {
                    let end = self.msg_end(wire)?;
                    layer_info = self.layer_info(end)?;
                }
                _ => self.skip(wire)?,
            }
        }
        match kind {
            Some(kind) => Ok(ComputedLayerInfo { kind, layer_info }),
            None => self.err("ComputedLayerInfo missing 'kind'"),
        }
    }
    fn process_stack(&mut self, end: usize) -> TechResult<ProcessStackInfo> {
        let mut stack = ProcessStackInfo::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => {
                    let end = self.msg_end(wire)?;
                    stack.layers.push(self.stack_layer(end)?);
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(stack)
    }
    fn stack_layer(&mut self, end: usize) -> TechResult<StackLayer> {
        let mut name = String::new();
        let mut declared: Option<LayerType> = None;
        let mut params: Option<StackLayerParams> = None;
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => name = self.string(wire)?,
                2 => {
                    let v = self.enum_i32(wire)?;
                    declared = match LayerType::from_i32(v) {
                        Some(t) => Some(t),
                        None => return self.err(format!("Invalid LayerType {}", v)),
                    };
                }
                10..=17 => {
                    if params.is_some() {
                        return self.err("Duplicate stack-layer parameter record");
                    }
                    let end = self.msg_end(wire)?;
                    params = Some(match tag {
                        10 => self.substrate_layer(end)?.into(),
                        11 => self.nwell_layer(end)?.into(),
                        12 => self.diffusion_layer(end)?.into(),
                        13 => self.field_oxide_layer(end)?.into(),
                        14 => self.metal_layer(end)?.into(),
                        15 => self.simple_dielectric_layer(end)?.into(),
                        16 => self.conformal_dielectric_layer(end)?.into(),
                        _ => self.sidewall_dielectric_layer(end)?.into(),
                    });
                }
                _ => self.skip(wire)?,
            }
        }
        let params = match params {
            Some(p) => p,
            None => return self.err("Stack layer missing its parameter record"),
        };
        if let Some(declared) = declared {
            if declared != params.layer_type() {
                return self.err(format!(
                    "layer_type {} does not match parameter record {}",
                    declared.as_str(),
                    params.layer_type().as_str()
                ));
            }
        }
        Ok(StackLayer { name, params })
    }
    fn substrate_layer(&mut self, end: usize) -> TechResult<SubstrateLayer> {
        let mut layer = SubstrateLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.height = self.f64(wire)?,
                2 => layer.thickness = self.f64(wire)?,
                3 => layer.reference = self.string(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn nwell_layer(&mut self, end: usize) -> TechResult<NWellLayer> {
        let mut layer = NWellLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.height = self.f64(wire)?,
                2 => layer.reference = self.string(wire)?,
                3 => {
                    let end = self.msg_end(wire)?;
                    layer.contact_above = Some(self.contact(end)?);
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn diffusion_layer(&mut self, end: usize) -> TechResult<DiffusionLayer> {
        let mut layer = DiffusionLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.height = self.f64(wire)?,
                2 => layer.reference = self.string(wire)?,
                3 => {
                    let end = self.msg_end(wire)?;
                    layer.contact_above = Some(self.contact(end)?);
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn field_oxide_layer(&mut self, end: usize) -> TechResult<FieldOxideLayer> {
        let mut layer = FieldOxideLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.dielectric_k = self.f64(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn metal_layer(&mut self, end: usize) -> TechResult<MetalLayer> {
        let mut layer = MetalLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.height = self.f64(wire)?,
                2 => layer.thickness = self.f64(wire)?,
                3 => layer.reference_below = self.string(wire)?,
                4 => layer.reference_above = self.string(wire)?,
                5 => {
                    let end = self.msg_end(wire)?;
                    layer.contact_above = Some(self.contact(end)?);
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn simple_dielectric_layer(&mut self, end: usize) -> TechResult<SimpleDielectricLayer> {
        let mut layer = SimpleDielectricLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.dielectric_k = self.f64(wire)?,
                2 => layer.reference = self.string(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn conformal_dielectric_layer(&mut self, end: usize) -> TechResult<ConformalDielectricLayer> {
        let mut layer = ConformalDielectricLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.dielectric_k = self.f64(wire)?,
                2 => layer.thickness_over_metal = self.f64(wire)?,
                3 => layer.thickness_where_no_metal = self.f64(wire)?,
                4 => layer.thickness_sidewall = self.f64(wire)?,
                5 => layer.reference = self.string(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn sidewall_dielectric_layer(&mut self, end: usize) -> TechResult<SidewallDielectricLayer> {
        let mut layer = SidewallDielectricLayer::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => layer.dielectric_k = self.f64(wire)?,
                2 => layer.height_above_metal = self.f64(wire)?,
                3 => layer.width_outside_sidewall = self.f64(wire)?,
                4 => layer.reference = self.string(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(layer)
    }
    fn contact(&mut self, end: usize) -> TechResult<Contact> {
        let mut contact = Contact::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => contact.name = self.string(wire)?,
                2 => contact.metal_above = self.string(wire)?,
                3 => contact.thickness = self.f64(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(contact)
    }
    fn extraction(&mut self, end: usize) -> TechResult<ExtractionInfo> {
        let mut ex = ExtractionInfo::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => ex.side_halo = self.f64(wire)?,
                2 => ex.fringe_shield_halo = self.f64(wire)?,
                3 => {
                    let end = self.msg_end(wire)?;
                    ex.resistance = self.resistance(end)?;
                }
                4 => {
                    let end = self.msg_end(wire)?;
                    ex.capacitance = self.capacitance(end)?;
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(ex)
    }
    fn resistance(&mut self, end: usize) -> TechResult<ResistanceInfo> {
        let mut res = ResistanceInfo::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => {
                    let end = self.msg_end(wire)?;
                    res.layers.push(self.layer_resistance(end)?);
                }
                2 => {
                    let end = self.msg_end(wire)?;
                    res.vias.push(self.via_resistance(end)?);
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(res)
    }
    fn layer_resistance(&mut self, end: usize) -> TechResult<LayerResistance> {
        let mut lr = LayerResistance::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => lr.layer_name = self.string(wire)?,
                2 => lr.resistance = self.f64(wire)?,
                3 => lr.corner_adjustment_fraction = Some(self.f64(wire)?),
                _ => self.skip(wire)?,
            }
        }
        Ok(lr)
    }
    fn via_resistance(&mut self, end: usize) -> TechResult<ViaResistance> {
        let mut vr = ViaResistance::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => vr.via_name = self.string(wire)?,
                2 => vr.resistance = self.f64(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(vr)
    }
    fn capacitance(&mut self, end: usize) -> TechResult<CapacitanceInfo> {
        let mut cap = CapacitanceInfo::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => {
                    let end = self.msg_end(wire)?;
                    cap.substrates.push(self.substrate_capacitance(end)?);
                }
                2 => {
                    let end = self.msg_end(wire)?;
                    cap.overlaps.push(self.overlap_capacitance(end)?);
                }
                3 => {
                    let end = self.msg_end(wire)?;
                    cap.sidewalls.push(self.sidewall_capacitance(end)?);
                }
                4 => {
                    let end = self.msg_end(wire)?;
                    cap.sideoverlaps.push(self.sideoverlap_capacitance(end)?);
                }
                _ => self.skip(wire)?,
            }
        }
        Ok(cap)
    }
    fn substrate_capacitance(&mut self, end: usize) -> TechResult<SubstrateCapacitance> {
        let mut sc = SubstrateCapacitance::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => sc.layer_name = self.string(wire)?,
                2 => sc.area_capacitance = self.f64(wire)?,
                3 => sc.perimeter_capacitance = self.f64(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(sc)
    }
    fn overlap_capacitance(&mut self, end: usize) -> TechResult<OverlapCapacitance> {
        let mut oc = OverlapCapacitance::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => oc.top_layer_name = self.string(wire)?,
                2 => oc.bottom_layer_name = self.string(wire)?,
                3 => oc.capacitance = self.f64(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(oc)
    }
    fn sidewall_capacitance(&mut self, end: usize) -> TechResult<SidewallCapacitance> {
        let mut swc = SidewallCapacitance::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => swc.layer_name = self.string(wire)?,
                2 => swc.capacitance = self.f64(wire)?,
                3 => swc.offset = self.f64(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(swc)
    }
    fn sideoverlap_capacitance(&mut self, end: usize) -> TechResult<SideOverlapCapacitance> {
        let mut soc = SideOverlapCapacitance::default();
        while self.pos < end {
            let (tag, wire) = self.field_key()?;
            match tag {
                1 => soc.in_layer_name = self.string(wire)?,
                2 => soc.out_layer_name = self.string(wire)?,
                3 => soc.capacitance = self.f64(wire)?,
                _ => self.skip(wire)?,
            }
        }
        Ok(soc)
    }
}
