//! Prompt builders, one per stage.
//!
//! Each builder is a pure function of its typed input. JSON stages embed the
//! exact output schema and forbid prose and markdown fences; the advice stage
//! asks for prose with a fixed tone instead.

use std::fmt::Write as _;

use salescopy_core::{Copy, ProductInfo, SalesAngle, SalesChannel};
use salescopy_llm::Prompt;

use crate::advice::{MarketingAdviceContext, PerformanceSummary};

pub const ANALYZE_ROLE: &str = "Expert JSON extractor";
pub const ANGLES_ROLE: &str = "Expert Sales Copywriter";
pub const COPY_ROLE: &str = "Expert Conversion Copywriter";
pub const ADAPT_ROLE: &str = "Expert Omnichannel Strategy";
pub const ADVICE_ROLE: &str = "Expert Media Buyer";

const JSON_ONLY: &str = "Responde ÚNICAMENTE con el objeto JSON descrito, sin texto adicional, \
sin explicaciones y sin bloques de código markdown.";

const PRODUCT_SCHEMA: &str = r#"{
  "name": "string",
  "summary": "string",
  "features": ["string (5-8 elementos)"],
  "benefits": ["string (4-6 elementos)"],
  "use_cases": ["string (3-5 elementos)"],
  "target_audience": "string",
  "price": "string o null",
  "shipping": "string o null",
  "colors": ["string"],
  "specifications": { "atributo": "valor" }
}"#;

const ANGLES_SCHEMA: &str = r#"{
  "angles": [
    {
      "id": "1",
      "title": "string",
      "description": "string",
      "hook": "string",
      "emotion": "escasez | urgencia | estatus | miedo | placer | pertenencia | ..."
    }
  ]
}"#;

const COPY_SCHEMA: &str = r#"{
  "description": "string (copy largo y persuasivo)",
  "main_focus": "string",
  "problems": ["string (3-5 elementos)"],
  "ideal_client": "string",
  "target_client": "string"
}"#;

const ADAPT_SCHEMA: &str = r#"{
  "adapted_copy": "string",
  "tips": ["string", "string"]
}"#;

/// Tone and format conventions the adapted copy must follow on each channel.
#[must_use]
pub fn channel_instruction(channel: SalesChannel) -> &'static str {
    match channel {
        SalesChannel::Instagram => {
            "visual, inspirador y cercano; primera línea que detenga el scroll, frases cortas, \
             emojis con moderación y 3-5 hashtags relevantes al final."
        }
        SalesChannel::Facebook => {
            "conversacional y orientado a comunidad; una historia breve, el beneficio principal \
             bien claro y una llamada a la acción explícita."
        }
        SalesChannel::Tiktok => {
            "enérgico, informal y nativo de la plataforma; escrito como guion hablado de 15-30 \
             segundos con un gancho en los primeros 3 segundos."
        }
        SalesChannel::Whatsapp => {
            "directo, personal y breve, como el mensaje de un amigo de confianza; sin hashtags, \
             como mucho un emoji y una pregunta o llamada a la acción al final."
        }
        SalesChannel::Email => {
            "una línea 'Asunto:' atractiva, saludo personal, cuerpo fácil de escanear en párrafos \
             cortos y una única llamada a la acción clara."
        }
        SalesChannel::Amazon => {
            "informativo y orientado a búsqueda; título con palabras clave, 5 viñetas de \
             beneficios y una descripción sin afirmaciones que no se puedan verificar."
        }
        SalesChannel::Landing => {
            "estructura de página de ventas: titular, subtítulo, beneficios, prueba social, \
             objeciones resueltas y llamada a la acción repetida."
        }
    }
}

fn push_list(out: &mut String, label: &str, items: &[String]) {
    let _ = writeln!(out, "{label}:");
    if items.is_empty() {
        out.push_str("- (sin datos)\n");
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

fn render_product(product: &ProductInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Nombre: {}", product.name);
    let _ = writeln!(out, "Resumen: {}", product.summary);
    push_list(&mut out, "Características", &product.features);
    push_list(&mut out, "Beneficios", &product.benefits);
    push_list(&mut out, "Casos de uso", &product.use_cases);
    let _ = writeln!(out, "Público objetivo: {}", product.target_audience);
    if let Some(price) = &product.price {
        let _ = writeln!(out, "Precio: {price}");
    }
    if let Some(shipping) = &product.shipping {
        let _ = writeln!(out, "Envío: {shipping}");
    }
    if !product.colors.is_empty() {
        let _ = writeln!(out, "Colores: {}", product.colors.join(", "));
    }
    if !product.specifications.is_empty() {
        out.push_str("Especificaciones:\n");
        for (key, value) in &product.specifications {
            let _ = writeln!(out, "- {key}: {value}");
        }
    }
    out
}

fn render_angle(angle: &SalesAngle) -> String {
    format!(
        "Título: {}\nDescripción: {}\nGancho: {}\nEmoción: {}\n",
        angle.title, angle.description, angle.hook, angle.emotion
    )
}

fn render_copy(copy: &Copy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Descripción: {}", copy.description);
    let _ = writeln!(out, "Enfoque principal: {}", copy.main_focus);
    push_list(&mut out, "Problemas que resuelve", &copy.problems);
    let _ = writeln!(out, "Cliente ideal: {}", copy.ideal_client);
    let _ = writeln!(out, "Cliente objetivo: {}", copy.target_client);
    out
}

/// Analyze stage: page text → [`ProductInfo`] JSON.
#[must_use]
pub fn analyze_prompt(page_text: &str) -> Prompt {
    let text = format!(
        "Analiza el siguiente contenido extraído de la página de un producto y extrae su \
         información comercial. Si un dato no aparece, usa null (o una lista/objeto vacío) en \
         lugar de inventarlo.\n\n\
         CONTENIDO DE LA PÁGINA:\n\"\"\"\n{page_text}\n\"\"\"\n\n\
         Devuelve un objeto JSON con exactamente esta estructura:\n{PRODUCT_SCHEMA}\n\n{JSON_ONLY}"
    );
    Prompt::json(ANALYZE_ROLE, text)
}

/// Angles stage: [`ProductInfo`] → five [`SalesAngle`]s.
#[must_use]
pub fn angles_prompt(product: &ProductInfo) -> Prompt {
    let text = format!(
        "Genera exactamente 5 ángulos de venta distintos para el siguiente producto. Cada \
         ángulo debe apoyarse en una motivación psicológica diferente (escasez, urgencia, \
         estatus, miedo, placer, etc.) e incluir un gancho listo para usar. Numera los ids del \
         \"1\" al \"5\" en el orden en que los presentas.\n\n\
         PRODUCTO:\n{product}\n\
         Devuelve un objeto JSON con exactamente esta estructura (5 elementos en \"angles\"):\n\
         {ANGLES_SCHEMA}\n\n{JSON_ONLY}",
        product = render_product(product),
    );
    Prompt::json(ANGLES_ROLE, text)
}

/// Copy stage: product + chosen angle → [`Copy`].
#[must_use]
pub fn copy_prompt(product: &ProductInfo, angle: &SalesAngle) -> Prompt {
    let text = format!(
        "Escribe un copy de ventas persuasivo para el producto usando el ángulo elegido como \
         eje de todo el mensaje. Identifica los problemas concretos que el producto resuelve y \
         describe al cliente ideal y al cliente objetivo.\n\n\
         PRODUCTO:\n{product}\n\
         ÁNGULO ELEGIDO:\n{angle}\n\
         Devuelve un objeto JSON con exactamente esta estructura:\n{COPY_SCHEMA}\n\n{JSON_ONLY}",
        product = render_product(product),
        angle = render_angle(angle),
    );
    Prompt::json(COPY_ROLE, text)
}

/// Adapt stage: copy + channel → [`AdaptedCopy`]. Product and angle add
/// context when the caller has them.
#[must_use]
pub fn adapt_prompt(
    copy: &Copy,
    channel: SalesChannel,
    product: Option<&ProductInfo>,
    angle: Option<&SalesAngle>,
) -> Prompt {
    let mut text = format!(
        "Adapta el siguiente copy de ventas al canal {name}. Mantén el mensaje central y el \
         ángulo, pero ajusta tono, longitud y formato a las convenciones del canal.\n\n\
         INSTRUCCIONES DEL CANAL ({name}): {instruction}\n\n\
         COPY ORIGINAL:\n{copy}\n",
        name = channel.display_name(),
        instruction = channel_instruction(channel),
        copy = render_copy(copy),
    );
    if let Some(product) = product {
        let _ = write!(text, "PRODUCTO:\n{}\n", render_product(product));
    }
    if let Some(angle) = angle {
        let _ = write!(text, "ÁNGULO:\n{}\n", render_angle(angle));
    }
    let _ = write!(
        text,
        "Incluye exactamente 2 consejos prácticos para publicar en {name}.\n\
         Devuelve un objeto JSON con exactamente esta estructura:\n{ADAPT_SCHEMA}\n\n{JSON_ONLY}",
        name = channel.display_name(),
    );
    Prompt::json(ADAPT_ROLE, text)
}

fn optional(value: Option<rust_decimal::Decimal>) -> String {
    value.map_or_else(|| "n/d".to_string(), |v| v.to_string())
}

fn push_performance_table(out: &mut String, title: &str, rows: &[PerformanceSummary]) {
    let _ = writeln!(out, "{title}:");
    for row in rows {
        let _ = writeln!(
            out,
            "- {}: gasto {}, clics {}, conversiones {}, ventas {}, ROAS {}, CPA {}",
            row.name,
            row.spend,
            row.clicks,
            row.conversions,
            row.revenue,
            optional(row.roas()),
            optional(row.cpa()),
        );
    }
    out.push('\n');
}

/// Advice stage: aggregated spend/profit context → free-form prose.
#[must_use]
pub fn advice_prompt(context: &MarketingAdviceContext) -> Prompt {
    let mut text = String::from(
        "Analiza el rendimiento de estas campañas de publicidad pagada y da recomendaciones \
         concretas: qué escalar, qué pausar, dónde redistribuir presupuesto y qué probar a \
         continuación.\n\n",
    );
    push_performance_table(&mut text, "TOTAL", std::slice::from_ref(&context.totals));
    push_performance_table(&mut text, "POR PLATAFORMA", &context.by_platform);
    push_performance_table(&mut text, "POR CAMPAÑA", &context.by_campaign);
    if let Some(profit) = &context.profit {
        let _ = writeln!(
            text,
            "RENTABILIDAD ({} productos): ingresos {}, costes {}, beneficio neto {}, margen {}%\n",
            profit.products,
            profit.revenue,
            profit.cost,
            profit.net,
            optional(profit.margin_pct()),
        );
    }
    text.push_str(
        "Tono: directo, práctico y sin rodeos, como un media buyer senior hablando con el dueño \
         del negocio. Responde en español, en prosa con párrafos cortos o viñetas; no devuelvas \
         JSON.",
    );
    Prompt::text(ADVICE_ROLE, text)
}
