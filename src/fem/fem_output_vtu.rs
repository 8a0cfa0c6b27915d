use super::{FemOutput, FemState};
use crate::mesh::Mesh;
use crate::StrError;
use std::fs::File;
use std::io::Write;

/// VTK cell type of the linear triangle
const VTK_TRIANGLE: usize = 5;

impl FemOutput {
    /// Writes a file associated with a single time station to perform visualization with ParaView
    ///
    /// The files will be indexed with `index` corresponding to each time station.
    pub fn write_vtu(&self, mesh: &Mesh, state: &FemState, index: usize) -> Result<(), StrError> {
        if !self.enabled() {
            return Err("FemOutput must be enabled first");
        }
        let npoint = mesh.points.len();
        let ncell = mesh.cells.len();
        if ncell < 1 {
            return Err("there are no cells to write");
        }
        if state.uu.dim() != npoint {
            return Err("the number of temperatures must be equal to the number of points");
        }

        // header
        let mut buffer = String::new();
        buffer.push_str(&format!(
            "<?xml version=\"1.0\"?>\n\
             <VTKFile type=\"UnstructuredGrid\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
             <UnstructuredGrid>\n\
             <Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">\n",
            npoint, ncell
        ));

        // nodes: coordinates
        buffer.push_str(
            "<Points>\n\
             <DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n",
        );
        for point in &mesh.points {
            buffer.push_str(&format!("{:?} {:?} 0.0 ", point.coords[0], point.coords[1]));
        }
        buffer.push_str(
            "\n</DataArray>\n\
             </Points>\n",
        );

        // elements: connectivity
        buffer.push_str(
            "<Cells>\n\
             <DataArray type=\"Int32\" Name=\"connectivity\" format=\"ascii\">\n",
        );
        for cell in &mesh.cells {
            buffer.push_str(&format!("{} {} {} ", cell.points[0], cell.points[1], cell.points[2]));
        }

        // elements: offsets
        buffer.push_str(
            "\n</DataArray>\n\
             <DataArray type=\"Int32\" Name=\"offsets\" format=\"ascii\">\n",
        );
        for i in 0..ncell {
            buffer.push_str(&format!("{} ", 3 * (i + 1)));
        }

        // elements: types
        buffer.push_str(
            "\n</DataArray>\n\
             <DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n",
        );
        for _ in 0..ncell {
            buffer.push_str(&format!("{} ", VTK_TRIANGLE));
        }
        buffer.push_str(
            "\n</DataArray>\n\
             </Cells>\n",
        );

        // data: points
        buffer.push_str(
            "<PointData Scalars=\"TheScalars\">\n\
             <DataArray type=\"Float64\" Name=\"temperature\" NumberOfComponents=\"1\" format=\"ascii\">\n",
        );
        for i in 0..npoint {
            buffer.push_str(&format!("{:?} ", state.uu[i]));
        }
        buffer.push_str("\n</DataArray>\n</PointData>\n");

        // data: cells
        buffer.push_str(
            "<CellData Scalars=\"TheScalars\">\n\
             <DataArray type=\"Int32\" Name=\"marker\" NumberOfComponents=\"1\" format=\"ascii\">\n",
        );
        for cell in &mesh.cells {
            buffer.push_str(&format!("{} ", cell.marker));
        }
        buffer.push_str("\n</DataArray>\n</CellData>\n");

        // footer
        buffer.push_str(
            "</Piece>\n\
             </UnstructuredGrid>\n\
             </VTKFile>\n",
        );

        // write file
        let path = self.path_vtu(index);
        let mut file = File::create(&path).map_err(|_| "cannot create VTU file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write VTU file")?;
        Ok(())
    }

    /// Writes a summary file for all time stations to perform visualization with ParaView
    pub fn write_pvd(&self) -> Result<(), StrError> {
        if !self.enabled() {
            return Err("FemOutput must be enabled first");
        }
        let mut buffer = String::new();
        buffer.push_str(
            "<?xml version=\"1.0\"?>\n\
             <VTKFile type=\"Collection\" version=\"0.1\" byte_order=\"LittleEndian\">\n\
             <Collection>\n",
        );
        for (index, t) in self.indices.iter().zip(&self.times) {
            buffer.push_str(&format!(
                "<DataSet timestep=\"{:?}\" file=\"{}\" />\n",
                t,
                self.path_vtu(*index)
            ));
        }
        buffer.push_str("</Collection>\n</VTKFile>\n");
        let path = self.path_pvd();
        let mut file = File::create(&path).map_err(|_| "cannot create PVD file")?;
        file.write_all(buffer.as_bytes()).map_err(|_| "cannot write PVD file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
