//! Built-in help templates.
//!
//! The text produced by these templates is relied on verbatim by programs
//! and tests downstream, so section names, order and spacing must not
//! drift. Rows of the form `names<TAB>usage` are aligned by the renderer.

/// Help for the whole application.
pub const APP_HELP_TEMPLATE: &str = r#"NAME:
   {{ name }}{% if usage %} - {{ usage }}{% endif %}

USAGE:
   {% if usage_text %}{{ usage_text }}{% else %}{{ help_name }} {% if visible_flags %}[global options]{% endif %}{% if commands %} command [command options]{% endif %} {% if args_usage %}{{ args_usage }}{% else %}[arguments...]{% endif %}{% endif %}{% if version %}{% if not hide_version %}

VERSION:
   {{ version }}{% endif %}{% endif %}{% if description %}

DESCRIPTION:
   {{ description }}{% endif %}{% if authors %}

AUTHOR{% if authors|length != 1 %}S{% endif %}:
   {% for author in authors %}{% if not loop.first %}
   {% endif %}{{ author }}{% endfor %}{% endif %}{% if visible_commands %}

COMMANDS:{% for category in visible_categories %}{% if category.name %}
   {{ category.name }}:{% endif %}{% for command in category.visible_commands %}
     {{ join(command.names, ", ") }}{{ "\t" }}{{ command.usage }}{% endfor %}{% endfor %}{% endif %}{% if visible_flags %}

GLOBAL OPTIONS:
   {% for option in visible_flags %}{% if not loop.first %}
   {% endif %}{{ option }}{% endfor %}{% endif %}{% if copyright %}

COPYRIGHT:
   {{ copyright }}{% endif %}
"#;

/// Help for a single command.
pub const COMMAND_HELP_TEMPLATE: &str = r#"NAME:
   {{ help_name }} - {{ usage }}

USAGE:
   {% if usage_text %}{{ usage_text }}{% else %}{{ help_name }}{% if visible_flags %} [command options]{% endif %} {% if args_usage %}{{ args_usage }}{% else %}[arguments...]{% endif %}{% endif %}{% if category %}

CATEGORY:
   {{ category }}{% endif %}{% if description %}

DESCRIPTION:
   {{ description }}{% endif %}{% if visible_flags %}

OPTIONS:
   {% for option in visible_flags %}{{ option }}
   {% endfor %}{% endif %}
"#;

/// Listing of the commands below a container.
pub const SUBCOMMAND_HELP_TEMPLATE: &str = r#"NAME:
   {{ help_name }} - {% if description %}{{ description }}{% else %}{{ usage }}{% endif %}

USAGE:
   {% if usage_text %}{{ usage_text }}{% else %}{{ help_name }} command{% if visible_flags %} [command options]{% endif %} {% if args_usage %}{{ args_usage }}{% else %}[arguments...]{% endif %}{% endif %}

COMMANDS:{% for category in visible_categories %}{% if category.name %}
   {{ category.name }}:{% endif %}{% for command in category.visible_commands %}
     {{ join(command.names, ", ") }}{{ "\t" }}{{ command.usage }}{% endfor %}
{% endfor %}{% if visible_flags %}
OPTIONS:
   {% for option in visible_flags %}{{ option }}
   {% endfor %}{% endif %}
"#;
