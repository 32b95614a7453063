//! PHP source serializer for the class tree

use super::php::{ClassType, Method, Parameter, PhpFile, PropertyDecl};

/// Serializes a [`PhpFile`] with tab indentation and one blank line between
/// class members.
#[derive(Debug, Clone)]
pub struct Printer {
    indent: String,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_file(&self, file: &PhpFile) -> String {
        let mut out = String::from("<?php\n\n");

        if file.strict_types {
            out.push_str("declare(strict_types=1);\n\n");
        }

        if !file.namespace.name().is_empty() {
            out.push_str(&format!("namespace {};\n\n", file.namespace.name()));
        }

        let mut has_uses = false;
        for fqcn in file.namespace.uses() {
            out.push_str(&format!("use {};\n", fqcn));
            has_uses = true;
        }
        if has_uses {
            out.push('\n');
        }

        out.push_str(&self.print_class(&file.class));
        out
    }

    pub fn print_class(&self, class: &ClassType) -> String {
        let mut out = String::new();

        out.push_str(&format!("class {}", class.name));
        if let Some(parent) = &class.extends {
            out.push_str(&format!(" extends {}", parent));
        }
        if !class.implements.is_empty() {
            out.push_str(&format!(" implements {}", class.implements.join(", ")));
        }
        out.push_str("\n{\n");

        let members: Vec<String> = class
            .properties
            .iter()
            .map(|p| self.print_property(p))
            .chain(class.methods.iter().map(|m| self.print_method(m)))
            .collect();
        out.push_str(&members.join("\n"));

        out.push_str("}\n");
        out
    }

    fn print_property(&self, property: &PropertyDecl) -> String {
        let mut out = self.indent.clone();
        out.push_str(property.visibility.as_str());
        if let Some(ty) = &property.ty {
            out.push_str(&format!(" {}", ty));
        }
        out.push_str(&format!(" ${}", property.name));
        if let Some(value) = &property.value {
            out.push_str(&format!(" = {}", value));
        }
        out.push_str(";\n");
        out
    }

    fn print_method(&self, method: &Method) -> String {
        let mut out = self.print_doc_comment(&method.comment, 1);

        out.push_str(&self.indent);
        out.push_str(method.visibility.as_str());
        if method.is_static {
            out.push_str(" static");
        }
        out.push_str(&format!(" function {}(", method.name));

        let multiline = method.params.iter().any(|p| p.promoted.is_some());
        if multiline {
            out.push('\n');
            for param in &method.params {
                out.push_str(&self.indent.repeat(2));
                out.push_str(&self.print_parameter(param));
                out.push_str(",\n");
            }
            out.push_str(&self.indent);
            out.push(')');
        } else {
            let params: Vec<String> = method.params.iter().map(|p| self.print_parameter(p)).collect();
            out.push_str(&params.join(", "));
            out.push(')');
        }

        if let Some(ty) = &method.return_type {
            out.push_str(&format!(": {}", ty));
        }

        if multiline {
            out.push_str(" {\n");
        } else {
            out.push('\n');
            out.push_str(&self.indent);
            out.push_str("{\n");
        }

        for line in &method.body {
            if line.trim().is_empty() {
                out.push('\n');
            } else {
                out.push_str(&self.indent.repeat(2));
                out.push_str(line);
                out.push('\n');
            }
        }

        out.push_str(&self.indent);
        out.push_str("}\n");
        out
    }

    fn print_parameter(&self, param: &Parameter) -> String {
        let mut out = String::new();
        if let Some(visibility) = param.promoted {
            out.push_str(visibility.as_str());
            out.push(' ');
        }
        if let Some(ty) = &param.ty {
            out.push_str(&format!("{} ", ty));
        }
        out.push_str(&format!("${}", param.name));
        if let Some(default) = &param.default {
            out.push_str(&format!(" = {}", default));
        }
        out
    }

    fn print_doc_comment(&self, lines: &[String], depth: usize) -> String {
        if lines.is_empty() {
            return String::new();
        }

        let indent = self.indent.repeat(depth);
        let mut out = format!("{}/**\n", indent);
        for line in lines {
            if line.is_empty() {
                out.push_str(&format!("{} *\n", indent));
            } else {
                out.push_str(&format!("{} * {}\n", indent, line));
            }
        }
        out.push_str(&format!("{} */\n", indent));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::php::{Literal, PhpType, Visibility};

    fn sample_file() -> PhpFile {
        let mut file = PhpFile::new("App\\Model\\Users\\Data", "UsersData");
        let interface = file.namespace.add_use("MondayFactory\\DatabaseModel\\Data\\IDatabaseData");
        file.class.implements.push(interface);

        file.class.add_property(
            PropertyDecl::new("note", Visibility::Protected)
                .typed(PhpType::nullable("string", true))
                .value(Literal::Null),
        );
        file.class.add_method(
            Method::new("__construct")
                .param(Parameter::new("id", PhpType::new("int")).promoted(Visibility::Protected))
                .param(
                    Parameter::new("name", PhpType::nullable("string", true))
                        .promoted(Visibility::Protected)
                        .default_value(Literal::Null),
                ),
        );
        file.class.add_method(
            Method::new("toArray")
                .returns(PhpType::new("array"))
                .comment("@return array<string, mixed>")
                .body("$data = get_object_vars($this);\n\nreturn $data;"),
        );
        file
    }

    #[test]
    fn test_print_file() {
        let expected = "<?php\n\
\n\
declare(strict_types=1);\n\
\n\
namespace App\\Model\\Users\\Data;\n\
\n\
use MondayFactory\\DatabaseModel\\Data\\IDatabaseData;\n\
\n\
class UsersData implements IDatabaseData\n\
{\n\
\tprotected ?string $note = null;\n\
\n\
\tpublic function __construct(\n\
\t\tprotected int $id,\n\
\t\tprotected ?string $name = null,\n\
\t) {\n\
\t}\n\
\n\
\t/**\n\
\t * @return array<string, mixed>\n\
\t */\n\
\tpublic function toArray(): array\n\
\t{\n\
\t\t$data = get_object_vars($this);\n\
\n\
\t\treturn $data;\n\
\t}\n\
}\n";

        assert_eq!(Printer::new().print_file(&sample_file()), expected);
    }

    #[test]
    fn test_plain_parameters_stay_on_one_line() {
        let method = Method::new("find")
            .param(Parameter::new("ids", PhpType::new("array")))
            .param(Parameter::new("limit", PhpType::nullable("int", true)).default_value(Literal::Null))
            .returns(PhpType::new("self"))
            .static_()
            .body("return new self();");

        let printed = Printer::new().print_method(&method);
        assert!(printed.starts_with(
            "\tpublic static function find(array $ids, ?int $limit = null): self\n\t{\n"
        ));
    }

    #[test]
    fn test_empty_class() {
        let file = PhpFile::new("", "Empty");
        assert_eq!(
            Printer::new().print_file(&file),
            "<?php\n\ndeclare(strict_types=1);\n\nclass Empty\n{\n}\n"
        );
    }
}
