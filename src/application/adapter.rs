use crate::domain::{
    detection::{BoundingBox, CanonicalDetection},
    raw::{DetectionTable, RawOutput},
};

/// Adaptador de detecciones: reduce la salida cruda de cualquier familia de
/// modelo a la secuencia canónica, en una única pasada por petición. Las
/// vistas derivadas (solo cajas, solo confianzas, solo clases) se calculan
/// sobre el resultado cacheado, nunca releyendo la salida cruda.
///
/// El orden de las detecciones es el que entregó el motor y es contrato para
/// el resto del núcleo.
#[derive(Debug)]
pub struct DetectionAdapter {
    detections: Vec<CanonicalDetection>,
}

impl DetectionAdapter {
    pub fn normalize(raw: RawOutput) -> Result<Self, String> {
        let detections = match raw {
            RawOutput::Rows { rows, class_names } => rows
                .iter()
                .enumerate()
                .map(|(idx, row)| row_to_detection(idx, row, &class_names))
                .collect::<Result<Vec<_>, String>>()?,
            RawOutput::Table(table) => {
                if !table.is_coherent() {
                    return Err("columnas de longitud desigual".into());
                }
                (0..table.len())
                    .map(|idx| column_to_detection(idx, &table))
                    .collect::<Result<Vec<_>, String>>()?
            }
        };
        Ok(Self { detections })
    }

    pub fn detections(&self) -> &[CanonicalDetection] {
        &self.detections
    }

    pub fn into_detections(self) -> Vec<CanonicalDetection> {
        self.detections
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Vista derivada: solo cajas.
    pub fn bounding_boxes(&self) -> Vec<BoundingBox> {
        self.detections.iter().map(|d| d.bbox).collect()
    }

    /// Vista derivada: solo confianzas.
    pub fn confidences(&self) -> Vec<f32> {
        self.detections.iter().map(|d| d.confidence).collect()
    }

    /// Vista derivada: solo ids de clase.
    pub fn class_ids(&self) -> Vec<i64> {
        self.detections.iter().map(|d| d.class_id).collect()
    }
}

/// Conversión a píxel entero. Un valor no finito o fuera del rango del tipo
/// de píxel invalida la fila completa.
fn cast_px(idx: usize, field: &str, value: f32) -> Result<i32, String> {
    if !value.is_finite() {
        return Err(format!("fila {idx}: {field} no finito ({value})"));
    }
    if value < i32::MIN as f32 || value > i32::MAX as f32 {
        return Err(format!("fila {idx}: {field} fuera de rango ({value})"));
    }
    Ok(value as i32)
}

fn build_detection(
    idx: usize,
    coords: [f32; 4],
    confidence: f32,
    class_id: f32,
    class_name: Option<&str>,
) -> Result<CanonicalDetection, String> {
    let [xmin, ymin, xmax, ymax] = coords;
    let bbox = BoundingBox {
        xmin: cast_px(idx, "xmin", xmin)?,
        ymin: cast_px(idx, "ymin", ymin)?,
        xmax: cast_px(idx, "xmax", xmax)?,
        ymax: cast_px(idx, "ymax", ymax)?,
    };
    if bbox.xmax < bbox.xmin || bbox.ymax < bbox.ymin {
        return Err(format!("fila {idx}: caja invertida"));
    }
    if !confidence.is_finite() {
        return Err(format!("fila {idx}: confianza no finita"));
    }
    if !class_id.is_finite() {
        return Err(format!("fila {idx}: clase no finita"));
    }
    let class_id = class_id as i64;
    let class_name = class_name
        .map(str::to_string)
        .unwrap_or_else(|| format!("clase_{class_id}"));
    Ok(CanonicalDetection {
        bbox,
        confidence,
        class_id,
        class_name,
    })
}

fn row_to_detection(
    idx: usize,
    row: &[f32; 6],
    class_names: &[String],
) -> Result<CanonicalDetection, String> {
    let name = if row[5].is_finite() {
        class_names.get(row[5] as usize).map(String::as_str)
    } else {
        None
    };
    build_detection(idx, [row[0], row[1], row[2], row[3]], row[4], row[5], name)
}

fn column_to_detection(idx: usize, table: &DetectionTable) -> Result<CanonicalDetection, String> {
    let det = build_detection(
        idx,
        [table.xmin[idx], table.ymin[idx], table.xmax[idx], table.ymax[idx]],
        table.confidence[idx],
        table.class_id[idx] as f32,
        Some(table.class_name[idx].as_str()),
    )?;
    // el id tabular ya es entero; evita el doble redondeo por f32
    Ok(CanonicalDetection {
        class_id: table.class_id[idx],
        ..det
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nombres() -> Vec<String> {
        vec!["persona".into(), "botella".into(), "lata".into()]
    }

    #[test]
    fn conserva_el_orden_del_motor() {
        let raw = RawOutput::Rows {
            rows: vec![
                [10.0, 10.0, 50.0, 60.0, 0.9, 1.0],
                [100.0, 20.0, 140.0, 80.0, 0.4, 2.0],
                [0.0, 0.0, 5.0, 5.0, 0.99, 0.0],
            ],
            class_names: nombres(),
        };
        let adapter = DetectionAdapter::normalize(raw).unwrap();
        let ids: Vec<i64> = adapter.class_ids();
        assert_eq!(ids, vec![1, 2, 0]);
        assert_eq!(adapter.detections()[0].class_name, "botella");
        assert_eq!(adapter.detections()[1].class_name, "lata");
    }

    #[test]
    fn rechaza_coordenadas_no_finitas() {
        let raw = RawOutput::Rows {
            rows: vec![[f32::NAN, 10.0, 50.0, 60.0, 0.9, 1.0]],
            class_names: nombres(),
        };
        let err = DetectionAdapter::normalize(raw).unwrap_err();
        assert!(err.contains("no finito"), "{err}");
    }

    #[test]
    fn rechaza_coordenadas_fuera_de_rango() {
        let raw = RawOutput::Rows {
            rows: vec![[1.0e12, 10.0, 1.0e12, 60.0, 0.9, 1.0]],
            class_names: nombres(),
        };
        assert!(DetectionAdapter::normalize(raw).is_err());
    }

    #[test]
    fn rechaza_caja_invertida() {
        let raw = RawOutput::Rows {
            rows: vec![[50.0, 10.0, 10.0, 60.0, 0.9, 1.0]],
            class_names: nombres(),
        };
        let err = DetectionAdapter::normalize(raw).unwrap_err();
        assert!(err.contains("invertida"), "{err}");
    }

    #[test]
    fn clase_sin_nombre_recibe_nombre_sintetico() {
        let raw = RawOutput::Rows {
            rows: vec![[0.0, 0.0, 1.0, 1.0, 0.5, 77.0]],
            class_names: nombres(),
        };
        let adapter = DetectionAdapter::normalize(raw).unwrap();
        assert_eq!(adapter.detections()[0].class_name, "clase_77");
    }

    #[test]
    fn tabla_incoherente_es_fallo_de_adaptacion() {
        let table = DetectionTable {
            xmin: vec![0.0, 1.0],
            ymin: vec![0.0],
            xmax: vec![2.0, 3.0],
            ymax: vec![2.0, 3.0],
            confidence: vec![0.5, 0.6],
            class_id: vec![0, 1],
            class_name: vec!["persona".into(), "botella".into()],
        };
        let err = DetectionAdapter::normalize(RawOutput::Table(table)).unwrap_err();
        assert!(err.contains("desigual"), "{err}");
    }

    #[test]
    fn tabla_coherente_se_normaliza_en_orden() {
        let table = DetectionTable {
            xmin: vec![10.0, 100.0],
            ymin: vec![10.0, 20.0],
            xmax: vec![50.0, 140.0],
            ymax: vec![60.0, 80.0],
            confidence: vec![0.9, 0.4],
            class_id: vec![1, 2],
            class_name: vec!["botella".into(), "lata".into()],
        };
        let adapter = DetectionAdapter::normalize(RawOutput::Table(table)).unwrap();
        assert_eq!(adapter.len(), 2);
        assert_eq!(adapter.confidences(), vec![0.9, 0.4]);
        assert_eq!(
            adapter.bounding_boxes()[1],
            BoundingBox {
                xmin: 100,
                ymin: 20,
                xmax: 140,
                ymax: 80
            }
        );
    }

    #[test]
    fn resultado_vacio_es_valido() {
        let raw = RawOutput::Rows {
            rows: vec![],
            class_names: nombres(),
        };
        let adapter = DetectionAdapter::normalize(raw).unwrap();
        assert!(adapter.is_empty());
        assert!(adapter.bounding_boxes().is_empty());
    }
}
