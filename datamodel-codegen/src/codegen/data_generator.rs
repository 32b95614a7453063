//! Data class generation
//!
//! A data class holds one row. Read-write columns are promoted constructor
//! parameters; read-only columns are plain properties filled by `fromRow`
//! through private setters.

use tracing::warn;

use super::code_generator::{ClassNames, RenderOptions};
use super::php::{Literal, Method, Parameter, PhpFile, PhpNamespace, PhpType, PropertyDecl, Visibility};
use super::ArtifactKind;
use crate::mapper::CallKind;
use crate::parser::{parse_flag_str, Property, ScalarType, TableDefinition};

pub(super) fn build_data(table: &TableDefinition, names: &ClassNames, options: &RenderOptions) -> PhpFile {
    let mut file = PhpFile::new(
        &names.namespace(ArtifactKind::Data),
        &names.class_name(ArtifactKind::Data),
    );
    let interface = file.namespace.add_use(&options.runtime.data_interface);
    file.class.implements.push(interface);

    file.class.add_method(constructor(&mut file.namespace, table));
    file.class.add_method(from_array(table, options));
    file.class.add_method(from_row(&mut file.namespace, table));
    file.class.add_method(
        Method::new("toArray")
            .returns(PhpType::new("array"))
            .body("return get_object_vars($this);"),
    );
    file.class.add_method(to_database_array(&mut file.namespace, table, options));

    for property in table.read_write_properties() {
        file.class.add_method(getter(&mut file.namespace, property));
    }

    for property in table.read_only_properties() {
        let ty = property_type(&mut file.namespace, property);
        let mut decl = PropertyDecl::new(&property.accessors().field, Visibility::Protected).typed(ty);
        if property.nullable {
            decl = decl.value(Literal::Null);
        }
        file.class.add_property(decl);

        file.class.add_method(setter(&mut file.namespace, property));
        file.class.add_method(getter(&mut file.namespace, property));
    }

    file
}

/// Signature type of a property, importing value-object types
fn property_type(namespace: &mut PhpNamespace, property: &Property) -> PhpType {
    let name = match &property.value_object {
        Some(mapping) => namespace.add_use(mapping.public_type()),
        None => property.scalar_type.php_type().to_string(),
    };
    PhpType::nullable(name, property.nullable)
}

/// Constructor default for a property, if it can be written as a literal
fn default_literal(property: &Property) -> Option<Literal> {
    if !property.has_default_value() {
        return None;
    }

    let Some(raw) = property.default_value.as_deref() else {
        return property.nullable.then_some(Literal::Null);
    };

    if property.is_value_object() {
        return None;
    }

    let literal = match property.scalar_type {
        ScalarType::Int => raw.parse::<i64>().ok().map(Literal::Int),
        ScalarType::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Literal::Float),
        ScalarType::Bool => Some(Literal::Bool(parse_flag_str(raw))),
        ScalarType::String => Some(Literal::Str(raw.to_string())),
        ScalarType::Json | ScalarType::DateTime => None,
    };

    if literal.is_none() {
        warn!(
            "Default {:?} of column {} is not a valid {} literal. Dropping it.",
            raw, property.name, property.scalar_type
        );
    }
    literal
}

fn constructor(namespace: &mut PhpNamespace, table: &TableDefinition) -> Method {
    let properties: Vec<&Property> = table.read_write_properties().collect();

    // Only the trailing run of defaulted parameters keeps its defaults
    let mut defaults: Vec<Option<Literal>> = vec![None; properties.len()];
    for (idx, property) in properties.iter().enumerate().rev() {
        match default_literal(property) {
            Some(literal) => defaults[idx] = Some(literal),
            None => break,
        }
    }

    let mut method = Method::new("__construct");
    for (property, default) in properties.into_iter().zip(defaults) {
        let mut param = Parameter::new(&property.accessors().field, property_type(namespace, property))
            .promoted(Visibility::Protected);
        if let Some(default) = default {
            param = param.default_value(default);
        }
        method = method.param(param);
    }
    method
}

fn from_array(table: &TableDefinition, options: &RenderOptions) -> Method {
    let args: Vec<String> = table
        .read_write_properties()
        .map(|p| format!("$data[{}]", Literal::Str(options.key_style.apply(&p.name))))
        .collect();

    Method::new("fromArray")
        .static_()
        .param(Parameter::new("data", PhpType::new("iterable")))
        .returns(PhpType::new("self"))
        .body(&format!("return {};", new_self(&args)))
}

/// Expression converting a raw row value into the property value
fn hydrate_expr(namespace: &mut PhpNamespace, property: &Property) -> String {
    let raw = format!("$row[{}]", Literal::Str(property.name.clone()));

    let expr = match &property.value_object {
        Some(mapping) => {
            let class_ref = match mapping.from_string.kind {
                CallKind::Static => namespace.add_use(&mapping.class_name),
                CallKind::Instance => String::new(),
            };
            mapping.from_string_literal(&class_ref, &raw)
        }
        None => match property.scalar_type {
            ScalarType::Json => format!("json_decode({}, true)", raw),
            ScalarType::DateTime => format!("new \\DateTimeImmutable({})", raw),
            scalar => match scalar.cast() {
                Some(cast) => format!("{} {}", cast, raw),
                None => raw.clone(),
            },
        },
    };

    if property.nullable {
        format!("isset({}) ? {} : null", raw, expr)
    } else {
        expr
    }
}

fn from_row(namespace: &mut PhpNamespace, table: &TableDefinition) -> Method {
    let args: Vec<String> = table
        .read_write_properties()
        .map(|p| hydrate_expr(namespace, p))
        .collect();

    let mut method = Method::new("fromRow")
        .static_()
        .param(Parameter::new("row", PhpType::new("array")))
        .returns(PhpType::new("self"))
        .comment("@param array<string, mixed> $row");

    if !table.has_read_only_properties() {
        return method.body(&format!("return {};", new_self(&args)));
    }

    method = method.body(&format!("$instance = {};", new_self(&args)));
    method.add_line("");
    for property in table.read_only_properties() {
        let value = hydrate_expr(namespace, property);
        method.add_line(format!("$instance->{}({});", property.accessors().setter, value));
    }
    method.add_line("");
    method.add_line("return $instance;");
    method
}

/// Expression converting the property value back into a raw column value
fn dehydrate_expr(namespace: &mut PhpNamespace, property: &Property, options: &RenderOptions) -> String {
    let value = format!("$this->{}", property.accessors().field);

    let expr = match &property.value_object {
        Some(mapping) => {
            let class_ref = match mapping.to_string.kind {
                CallKind::Static => namespace.add_use(&mapping.class_name),
                CallKind::Instance => String::new(),
            };
            mapping.to_string_literal(&class_ref, &value)
        }
        None => match property.scalar_type {
            ScalarType::Json => format!("json_encode({})", value),
            ScalarType::DateTime => format!(
                "{}->format({})",
                value,
                Literal::Str(options.datetime_format.clone())
            ),
            _ => return value,
        },
    };

    if property.nullable {
        format!("{} === null ? null : {}", value, expr)
    } else {
        expr
    }
}

fn to_database_array(namespace: &mut PhpNamespace, table: &TableDefinition, options: &RenderOptions) -> Method {
    let entries: Vec<String> = table
        .read_write_properties()
        .map(|p| {
            format!(
                "{} => {},",
                Literal::Str(p.name.clone()),
                dehydrate_expr(namespace, p, options)
            )
        })
        .collect();

    let body = if entries.is_empty() {
        "return [];".to_string()
    } else {
        format!("return [\n\t{}\n];", entries.join("\n\t"))
    };

    Method::new("toDatabaseArray")
        .returns(PhpType::new("array"))
        .comment("@return array<string, mixed>")
        .body(&body)
}

fn getter(namespace: &mut PhpNamespace, property: &Property) -> Method {
    Method::new(&property.accessors().getter)
        .returns(property_type(namespace, property))
        .body(&format!("return $this->{};", property.accessors().field))
}

fn setter(namespace: &mut PhpNamespace, property: &Property) -> Method {
    let field = &property.accessors().field;
    Method::new(&property.accessors().setter)
        .visibility(Visibility::Private)
        .param(Parameter::new(field, property_type(namespace, property)))
        .returns(PhpType::new("self"))
        .body(&format!("$this->{0} = ${0};\n\nreturn $this;", field))
}

/// `new self(...)` with one argument per line
fn new_self(args: &[String]) -> String {
    if args.is_empty() {
        "new self()".to_string()
    } else {
        format!("new self(\n\t{},\n)", args.join(",\n\t"))
    }
}
